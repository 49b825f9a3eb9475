use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rand::Rng;

use crate::api::web::dto::{
    OrderLineCreateErrorDto, OrderLineCreateErrorReason, OrderLineReqDto,
};
use crate::error::{AppError, AppErrorCode};
use crate::generate_custom_uid;

use super::{ProductKind, ProductModel};

#[derive(Debug, Eq, Clone, PartialEq)]
pub enum OrderStatus {
    Pending,
    Success,
    Cancel,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Cancel => "cancel",
        }
    }
}
impl FromStr for OrderStatus {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "cancel" => Ok(Self::Cancel),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("order-status, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, Eq, Clone, PartialEq)]
pub enum OrderPaymentMethod {
    CashOnDelivery,
    Payos,
}

impl OrderPaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::Payos => "payos",
        }
    }
}
impl FromStr for OrderPaymentMethod {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::CashOnDelivery),
            "payos" => Ok(Self::Payos),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("payment-method, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineModel {
    pub product_id: u64,
    pub kind: ProductKind,
    pub quantity: u32,
    // unit price snapshot taken at order time, later catalog edits
    // must not affect persisted orders
    pub unit_price: u32,
}

#[derive(Debug)]
pub struct OrderModel {
    pub id_: String,
    pub code: String,
    pub owner_id: u32,
    pub lines: Vec<OrderLineModel>,
    pub status: OrderStatus,
    // total reported by the storefront client, not recomputed at server side
    pub total_amount: u64,
    pub payment_method: OrderPaymentMethod,
    pub note: Option<String>,
    pub create_time: DateTime<FixedOffset>,
}

impl Clone for OrderModel {
    fn clone(&self) -> Self {
        Self {
            id_: self.id_.clone(),
            code: self.code.clone(),
            owner_id: self.owner_id,
            lines: self.lines.clone(),
            status: self.status.clone(),
            total_amount: self.total_amount,
            payment_method: self.payment_method.clone(),
            note: self.note.clone(),
            create_time: self.create_time,
        }
    }
}

impl OrderModel {
    pub fn generate_id(machine_code: u8) -> String {
        // utility for generating top-level identifier to each order
        let oid = generate_custom_uid(machine_code);
        let bs = oid.into_bytes();
        bs.iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join("")
    }

    // display code shown to buyers, `ORD-` followed by the last 3 digits of
    // current epoch-millis then a random number 0-999. Collisions are possible
    // under load, the code is kept only as a human-facing reference while
    // `id_` remains the primary key.
    pub fn generate_code(epoch_millis: u64) -> String {
        let tail = epoch_millis % 1000;
        let nonce = rand::thread_rng().gen_range(0u16..1000u16);
        format!("ORD-{:03}{}", tail, nonce)
    }

    /// `pending` may move to either terminal state, terminal states never
    /// transition again
    pub fn try_transit(&mut self, next: OrderStatus) -> DefaultResult<(), AppError> {
        let allowed = matches!(
            (&self.status, &next),
            (OrderStatus::Pending, OrderStatus::Success) | (OrderStatus::Pending, OrderStatus::Cancel)
        );
        if allowed {
            self.status = next;
            Ok(())
        } else {
            let detail = format!(
                "order:{}, from:{}, to:{}",
                self.id_,
                self.status.as_str(),
                next.as_str()
            );
            Err(AppError {
                code: AppErrorCode::InvalidStatusTransition,
                detail: Some(detail),
            })
        }
    }

    /// match requested lines against loaded catalog snapshots, collecting
    /// per-line client errors instead of failing on the first one
    pub fn validate_lines(
        data: Vec<OrderLineReqDto>,
        products: &[ProductModel],
    ) -> DefaultResult<Vec<OrderLineModel>, Vec<OrderLineCreateErrorDto>> {
        let mut client_errors = vec![];
        let lines = data
            .into_iter()
            .filter_map(|d| {
                let result = products.iter().find(|p| p.id_ == d.product_id);
                let product = match result {
                    Some(p) if p.purchasable() => p,
                    _others => {
                        client_errors.push(OrderLineCreateErrorDto {
                            product_id: d.product_id,
                            reason: OrderLineCreateErrorReason::NotExist,
                            available: None,
                            requested: None,
                        });
                        return None;
                    }
                };
                match &d.kind {
                    ProductKind::Digital => {
                        if d.quantity != 1 {
                            client_errors.push(OrderLineCreateErrorDto {
                                product_id: d.product_id,
                                reason: OrderLineCreateErrorReason::DigitalQuantityNotOne,
                                available: None,
                                requested: Some(d.quantity),
                            });
                            return None;
                        }
                    }
                    ProductKind::Physical => {
                        if d.quantity == 0 || product.num_avail() < d.quantity {
                            client_errors.push(OrderLineCreateErrorDto {
                                product_id: d.product_id,
                                reason: OrderLineCreateErrorReason::OutOfStock,
                                available: Some(product.num_avail()),
                                requested: Some(d.quantity),
                            });
                            return None;
                        }
                    }
                }
                Some(OrderLineModel {
                    product_id: d.product_id,
                    unit_price: product.unit_price(&d.kind),
                    kind: d.kind,
                    quantity: d.quantity,
                })
            })
            .collect();
        if client_errors.is_empty() {
            Ok(lines)
        } else {
            Err(client_errors)
        }
    } // end of fn validate_lines

    /// physical lines paired with the number of copies they hold
    pub fn physical_reservations(&self) -> Vec<(u64, u32)> {
        self.lines
            .iter()
            .filter(|l| l.kind == ProductKind::Physical)
            .map(|l| (l.product_id, l.quantity))
            .collect()
    }
} // end of impl OrderModel
