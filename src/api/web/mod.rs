use std::collections::HashMap;

use axum::http::{
    header as HttpHeader, HeaderMap as HttpHeaderMap, HeaderValue as HttpHeaderValue,
    StatusCode as HttpStatusCode,
};
use axum::routing::{delete, get, patch, post, MethodRouter};
use chrono::Local as LocalTime;
use http_body::Body as HttpBody;
use serde::Serialize;

use crate::constant::api::web as WebConst;
use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::{AppSharedState, WebApiHdlrLabel};

use self::dto::{RespEnvelopeDto, RespStatusLabel};

mod auth;
mod booking;
pub mod dto;
mod field;
mod order;
mod payment;
mod product;

// type parameter `HB` for http body of the method router has to match the
// same type parameter in `axum::Router`
pub type ApiRouteType<HB> = MethodRouter<AppSharedState, HB>;
pub type ApiRouteTableType<HB> = HashMap<WebApiHdlrLabel, ApiRouteType<HB>>;

pub fn route_table<HB>() -> ApiRouteTableType<HB>
where
    HB: HttpBody + Send + 'static,
    <HB as HttpBody>::Data: Send,
    <HB as HttpBody>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut out: ApiRouteTableType<HB> = HashMap::new();
    out.insert(WebConst::AUTH_LOGIN, post(auth::login_handler));
    out.insert(WebConst::CREATE_NEW_ORDER, post(order::create_handler));
    out.insert(WebConst::LIST_OWNER_ORDERS, get(order::list_handler));
    out.insert(
        WebConst::ACCESS_EXISTING_ORDER,
        get(order::fetch_handler).delete(order::remove_handler),
    );
    out.insert(
        WebConst::UPDATE_ORDER_STATUS,
        patch(order::update_status_handler),
    );
    out.insert(WebConst::CREATE_PAYMENT_LINK, post(payment::create_handler));
    out.insert(WebConst::CANCEL_PAYMENT, patch(payment::cancel_handler));
    out.insert(
        WebConst::PAYMENT_GATEWAY_WEBHOOK,
        post(payment::webhook_handler),
    );
    out.insert(WebConst::CREATE_BOOKING, post(booking::create_handler));
    out.insert(WebConst::LIST_BOOKING_SLOTS, get(booking::slots_handler));
    out.insert(
        WebConst::PRODUCT_COLLECTION,
        post(product::create_handler).get(product::list_handler),
    );
    out.insert(
        WebConst::MAINTAIN_PRODUCT,
        get(product::fetch_handler)
            .patch(product::edit_handler)
            .delete(product::discard_handler),
    );
    out.insert(
        WebConst::CATEGORY_COLLECTION,
        post(product::create_category_handler).get(product::list_categories_handler),
    );
    out.insert(
        WebConst::FIELD_COLLECTION,
        post(field::create_handler).get(field::list_handler),
    );
    out.insert(
        WebConst::ACCESS_FIELD,
        get(field::fetch_handler).delete(field::discard_handler),
    );
    out.insert(WebConst::CREATE_SUBFIELD, post(field::create_subfield_handler));
    out.insert(
        WebConst::UPDATE_SUBFIELD_STATUS,
        patch(field::update_subfield_status_handler),
    );
    out
} // end of fn route_table

pub(super) type WebApiRespPayload = (HttpStatusCode, HttpHeaderMap, String);

// every endpoint answers the same envelope shape, handlers only choose the
// status code, the label, and the optional data object
pub(super) fn envelope_response<T: Serialize>(
    code: HttpStatusCode,
    label: RespStatusLabel,
    message: &str,
    data: Option<T>,
) -> WebApiRespPayload {
    let obj = RespEnvelopeDto {
        status: label,
        code: code.as_u16(),
        message: message.to_string(),
        data,
        meta: None,
        timestamp: LocalTime::now().fixed_offset().to_rfc3339(),
    };
    let serialized = serde_json::to_string(&obj)
        .unwrap_or_else(|_e| r#"{"status":"error","reason":"serialization-failure"}"#.to_string());
    let resp_ctype_val = HttpHeaderValue::from_str(HTTP_CONTENT_TYPE_JSON).unwrap();
    let mut hdr_map = HttpHeaderMap::new();
    hdr_map.insert(HttpHeader::CONTENT_TYPE, resp_ctype_val);
    (code, hdr_map, serialized)
}

pub(super) fn success_response<T: Serialize>(
    code: HttpStatusCode,
    message: &str,
    data: Option<T>,
) -> WebApiRespPayload {
    envelope_response(code, RespStatusLabel::Success, message, data)
}

pub(super) fn fail_response<T: Serialize>(
    code: HttpStatusCode,
    message: &str,
    data: Option<T>,
) -> WebApiRespPayload {
    envelope_response(code, RespStatusLabel::Fail, message, data)
}

// internal failure, detail goes to the log only
pub(super) fn error_response() -> WebApiRespPayload {
    envelope_response::<()>(
        HttpStatusCode::INTERNAL_SERVER_ERROR,
        RespStatusLabel::Error,
        "internal-error",
        None,
    )
}
