use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::model::ProductKind;

// ---- uniform response envelope ----------------------------------------
// every endpoint responds `{status, code, message, data?, timestamp}`,
// `fail` marks business rejections (4xx), `error` marks server faults (5xx)

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RespStatusLabel {
    Success,
    Fail,
    Error,
}

#[derive(Serialize)]
pub struct RespEnvelopeDto<T: Serialize> {
    pub status: RespStatusLabel,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    // reserved for collection endpoints, e.g. pagination counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub timestamp: String,
}

// ---- auth --------------------------------------------------------------

#[derive(Deserialize, Serialize)]
pub struct LoginReqDto {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize)]
pub struct LoginRespDto {
    pub access_token: String,
    pub profile: u32,
    pub role: String,
}

// ---- orders ------------------------------------------------------------

#[derive(Deserialize, Serialize)]
pub struct OrderLineReqDto {
    pub product_id: u64,
    pub kind: ProductKind,
    pub quantity: u32,
}

#[derive(Deserialize, Serialize)]
pub struct OrderCreateReqData {
    pub lines: Vec<OrderLineReqDto>,
    // grand total computed by the storefront client
    pub total_amount: u64,
    pub payment_method: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub enum OrderLineCreateErrorReason {
    NotExist,
    DigitalQuantityNotOne,
    OutOfStock,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrderLineCreateErrorDto {
    pub product_id: u64,
    pub reason: OrderLineCreateErrorReason,
    pub available: Option<u32>,
    pub requested: Option<u32>,
}

#[derive(Serialize)]
pub struct OrderLinePresentDto {
    pub product_id: u64,
    pub kind: ProductKind,
    pub quantity: u32,
    pub unit_price: u32,
}

#[derive(Serialize)]
pub struct OrderPresentDto {
    pub order_id: String,
    pub code: String,
    pub owner_id: u32,
    pub status: String,
    pub total_amount: u64,
    pub payment_method: String,
    pub note: Option<String>,
    pub lines: Vec<OrderLinePresentDto>,
    pub create_time: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
pub struct OrderStatusUpdateReqDto {
    pub status: String,
}

// ---- payments ----------------------------------------------------------

#[derive(Deserialize)]
pub struct PaymentCreateReqDto {
    pub order_id: String,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct PaymentPresentDto {
    pub gateway_code: i64,
    pub order_id: String,
    pub amount: u64,
    pub status: String,
    pub checkout_url: String,
    pub qr_code: String,
    pub expired_time: Option<DateTime<FixedOffset>>,
    pub paid_time: Option<DateTime<FixedOffset>>,
}

// ---- bookings ----------------------------------------------------------

#[derive(Deserialize, Serialize)]
pub struct BookingCreateReqDto {
    pub day: String,
    pub duration: String,
    pub total_price: u32,
}

#[derive(Serialize)]
pub struct BookingPresentDto {
    pub booking_id: String,
    pub sub_field_id: u64,
    pub owner_id: u32,
    pub day: String,
    pub duration: String,
    pub total_price: u32,
    pub status: String,
}

#[derive(Serialize)]
pub struct SlotPresentDto {
    pub duration: String,
    pub is_booked: bool,
}

// ---- catalog -----------------------------------------------------------

#[derive(Deserialize, Serialize)]
pub struct ProductCreateReqDto {
    pub name: String,
    pub category_id: u64,
    pub digital_price: u32,
    pub physical_price: u32,
    pub quantity: u32,
    pub available: bool,
}

#[derive(Deserialize)]
pub struct ProductEditReqDto {
    pub name: Option<String>,
    pub digital_price: Option<u32>,
    pub physical_price: Option<u32>,
    pub quantity: Option<u32>,
    pub available: Option<bool>,
}

#[derive(Serialize)]
pub struct ProductPresentDto {
    pub product_id: u64,
    pub name: String,
    pub category_id: u64,
    pub digital_price: u32,
    pub physical_price: u32,
    pub quantity: u32,
    pub available: bool,
}

#[derive(Deserialize, Serialize)]
pub struct CategoryCreateReqDto {
    pub name: String,
}

#[derive(Serialize)]
pub struct CategoryPresentDto {
    pub category_id: u64,
    pub name: String,
}

// ---- facilities --------------------------------------------------------

#[derive(Deserialize, Serialize)]
pub struct FieldCreateReqDto {
    pub name: String,
    pub location: String,
}

#[derive(Serialize)]
pub struct FieldPresentDto {
    pub field_id: u64,
    pub name: String,
    pub location: String,
    pub sub_fields: Vec<SubFieldPresentDto>,
}

#[derive(Deserialize, Serialize)]
pub struct SubFieldCreateReqDto {
    pub name: String,
    pub slot_price: u32,
}

#[derive(Deserialize)]
pub struct SubFieldStatusReqDto {
    pub status: String,
}

#[derive(Serialize)]
pub struct SubFieldPresentDto {
    pub sub_field_id: u64,
    pub field_id: u64,
    pub name: String,
    pub slot_price: u32,
    pub status: String,
}
