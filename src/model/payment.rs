use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rand::Rng;

use crate::constant::limit::MAX_PAYMENT_AMOUNT_VND;
use crate::error::{AppError, AppErrorCode};

#[derive(Debug, Eq, Clone, PartialEq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }
}
impl FromStr for PaymentStatus {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELLED" => Ok(Self::Cancelled),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("payment-status, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug)]
pub struct PaymentModel {
    // numeric code identifying this payment at the remote gateway,
    // also the lookup key for inbound webhooks
    pub gateway_code: i64,
    pub order_id: String,
    pub owner_id: u32,
    pub amount: u64,
    pub status: PaymentStatus,
    pub link_id: String,
    pub checkout_url: String,
    pub qr_code: String,
    pub expired_time: Option<DateTime<FixedOffset>>,
    pub transaction_ref: Option<String>,
    // raw webhook payload snapshot kept for later inspection
    pub webhook_snapshot: Option<String>,
    pub paid_time: Option<DateTime<FixedOffset>>,
    pub create_time: DateTime<FixedOffset>,
}

impl Clone for PaymentModel {
    fn clone(&self) -> Self {
        Self {
            gateway_code: self.gateway_code,
            order_id: self.order_id.clone(),
            owner_id: self.owner_id,
            amount: self.amount,
            status: self.status.clone(),
            link_id: self.link_id.clone(),
            checkout_url: self.checkout_url.clone(),
            qr_code: self.qr_code.clone(),
            expired_time: self.expired_time,
            transaction_ref: self.transaction_ref.clone(),
            webhook_snapshot: self.webhook_snapshot.clone(),
            paid_time: self.paid_time,
            create_time: self.create_time,
        }
    }
}

impl PaymentModel {
    /// the gateway refuses amounts outside this window, reject before any
    /// remote call is attempted
    pub fn validate_amount(amount: u64) -> DefaultResult<(), AppError> {
        if amount == 0 || amount > MAX_PAYMENT_AMOUNT_VND {
            let detail = format!("amount:{}, limit:{}", amount, MAX_PAYMENT_AMOUNT_VND);
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(detail),
            })
        } else {
            Ok(())
        }
    }

    // gateway order codes have to be numeric, derive one from current time
    // plus a random tail. Uniqueness is checked against saved payments by
    // the caller, not here.
    pub fn generate_gateway_code(epoch_millis: u64) -> i64 {
        let head = (epoch_millis % 1_000_000_000) as i64;
        let nonce = rand::thread_rng().gen_range(0i64..1000i64);
        head * 1000 + nonce
    }

    pub fn mark_paid(
        &mut self,
        tx_ref: Option<String>,
        snapshot: String,
        time: DateTime<FixedOffset>,
    ) {
        self.status = PaymentStatus::Paid;
        self.transaction_ref = tx_ref;
        self.webhook_snapshot = Some(snapshot);
        self.paid_time = Some(time);
    }

    pub fn mark_failed(&mut self, snapshot: String) {
        self.status = PaymentStatus::Failed;
        self.webhook_snapshot = Some(snapshot);
    }

    /// only a pending payment can be cancelled by its owner
    pub fn try_cancel(&mut self) -> DefaultResult<(), AppError> {
        if self.status == PaymentStatus::Pending {
            self.status = PaymentStatus::Cancelled;
            Ok(())
        } else {
            let detail = format!(
                "payment:{}, status:{}",
                self.gateway_code,
                self.status.as_str()
            );
            Err(AppError {
                code: AppErrorCode::InvalidStatusTransition,
                detail: Some(detail),
            })
        }
    }
} // end of impl PaymentModel
