use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::Local as LocalTime;
use serde_json::Value as JsnVal;

use crate::adapter::processor::{
    AbstractPaymentProcessor, AppProcessorErrorReason, AppProcessorPayLinkReq,
};
use crate::api::web::dto::{PaymentCreateReqDto, PaymentPresentDto};
use crate::constant::GATEWAY_RESULT_CODE_OK;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{OrderPaymentMethod, OrderStatus, PaymentModel, PaymentStatus};
use crate::repository::{AbsOrderRepo, AbsPaymentRepo, AbsProductRepo};
use crate::AppAuthedClaim;

use super::manage_order::restore_stock_cb;

fn payment_present_dto(m: PaymentModel) -> PaymentPresentDto {
    PaymentPresentDto {
        gateway_code: m.gateway_code,
        order_id: m.order_id,
        amount: m.amount,
        status: m.status.as_str().to_string(),
        checkout_url: m.checkout_url,
        qr_code: m.qr_code,
        expired_time: m.expired_time,
        paid_time: m.paid_time,
    }
}

pub enum CreatePaymentUcError {
    OrderNotFound,
    OwnerMismatch,
    OrderNotPending(String),
    MethodNotGateway(String),
    AlreadyExists(i64),
    AmountOutOfRange(String),
    GatewayDecline(String),
    Server(AppError),
}

impl From<AppError> for CreatePaymentUcError {
    fn from(value: AppError) -> Self {
        Self::Server(value)
    }
}

pub struct CreatePaymentUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_payment: Box<dyn AbsPaymentRepo>,
    pub processors: Arc<Box<dyn AbstractPaymentProcessor>>,
    pub auth_claim: AppAuthedClaim,
    // front-end pages the buyer returns to after checkout
    pub return_url: String,
    pub cancel_url: String,
    pub logctx: Arc<AppLogContext>,
}

impl CreatePaymentUseCase {
    pub async fn execute(
        self,
        req: PaymentCreateReqDto,
    ) -> DefaultResult<PaymentPresentDto, CreatePaymentUcError> {
        let order = match self.repo_order.fetch(req.order_id.as_str()).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::OrderNotExist => {
                return Err(CreatePaymentUcError::OrderNotFound);
            }
            Err(e) => {
                return Err(CreatePaymentUcError::Server(e));
            }
        };
        if order.owner_id != self.auth_claim.profile {
            return Err(CreatePaymentUcError::OwnerMismatch);
        }
        if order.payment_method != OrderPaymentMethod::Payos {
            return Err(CreatePaymentUcError::MethodNotGateway(
                order.payment_method.as_str().to_string(),
            ));
        }
        if order.status != OrderStatus::Pending {
            return Err(CreatePaymentUcError::OrderNotPending(
                order.status.as_str().to_string(),
            ));
        }
        PaymentModel::validate_amount(order.total_amount)
            .map_err(|e| CreatePaymentUcError::AmountOutOfRange(e.detail.unwrap_or_default()))?;
        // one payment per order
        if let Some(existing) = self.repo_payment.fetch_by_order(order.id_.as_str()).await? {
            return Err(CreatePaymentUcError::AlreadyExists(existing.gateway_code));
        }
        let timenow = LocalTime::now().fixed_offset();
        let gateway_code = PaymentModel::generate_gateway_code(timenow.timestamp_millis() as u64);
        let description = req
            .description
            .unwrap_or_else(|| format!("thanh toan {}", order.code));
        let link_req = AppProcessorPayLinkReq {
            gateway_code,
            amount: order.total_amount,
            description,
            return_url: self.return_url.clone(),
            cancel_url: self.cancel_url.clone(),
        };
        let link = match self.processors.create_payment_link(link_req).await {
            Ok(v) => v,
            Err(e) => {
                let logctx_p = &self.logctx;
                app_log_event!(logctx_p, AppLogLevel::WARNING, "pay-link-fail {:?}", e);
                return Err(match e.reason {
                    AppProcessorErrorReason::GatewayDecline(desc) => {
                        CreatePaymentUcError::GatewayDecline(desc)
                    }
                    _others => CreatePaymentUcError::Server(AppError {
                        code: AppErrorCode::RemoteGatewayFailure,
                        detail: Some(format!("{:?}", _others)),
                    }),
                });
            }
        };
        let saved = PaymentModel {
            gateway_code,
            order_id: order.id_.clone(),
            owner_id: order.owner_id,
            amount: order.total_amount,
            status: PaymentStatus::Pending,
            link_id: link.link_id,
            checkout_url: link.checkout_url,
            qr_code: link.qr_code,
            expired_time: link.expired_time,
            transaction_ref: None,
            webhook_snapshot: None,
            paid_time: None,
            create_time: timenow,
        };
        self.repo_payment.create(saved.clone()).await?;
        Ok(payment_present_dto(saved))
    } // end of fn execute
} // end of impl CreatePaymentUseCase

pub enum PaymentWebhookUcOutput {
    Processed(PaymentPresentDto),
    InvalidSignature,
    MalformedPayload(String),
    PaymentNotFound(i64),
}

pub struct PaymentWebhookUseCase {
    pub repo_payment: Box<dyn AbsPaymentRepo>,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub processors: Arc<Box<dyn AbstractPaymentProcessor>>,
    pub logctx: Arc<AppLogContext>,
}

impl PaymentWebhookUseCase {
    pub async fn execute(
        self,
        payload: JsnVal,
    ) -> DefaultResult<PaymentWebhookUcOutput, AppError> {
        let claimed_sig = payload
            .get("signature")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if !self
            .processors
            .verify_webhook_signature(claimed_sig, &payload)
        {
            let logctx_p = &self.logctx;
            app_log_event!(logctx_p, AppLogLevel::WARNING, "webhook signature mismatch");
            return Ok(PaymentWebhookUcOutput::InvalidSignature);
        }
        let data = match payload.get("data") {
            Some(JsnVal::Object(_)) => payload.get("data").unwrap(),
            _others => {
                return Ok(PaymentWebhookUcOutput::MalformedPayload(
                    "missing-data".to_string(),
                ));
            }
        };
        let gateway_code = match data.get("orderCode").and_then(|v| v.as_i64()) {
            Some(v) => v,
            None => {
                return Ok(PaymentWebhookUcOutput::MalformedPayload(
                    "missing-order-code".to_string(),
                ));
            }
        };
        let mut payment = match self.repo_payment.fetch_by_code(gateway_code).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::PaymentNotExist => {
                return Ok(PaymentWebhookUcOutput::PaymentNotFound(gateway_code));
            }
            Err(e) => {
                return Err(e);
            }
        };
        let inner_code = data.get("code").and_then(|v| v.as_str()).unwrap_or("");
        let snapshot = payload.to_string();
        // duplicate deliveries simply reapply the same terminal state, there
        // is no dedicated idempotency guard
        if inner_code == GATEWAY_RESULT_CODE_OK {
            let timenow = LocalTime::now().fixed_offset();
            let tx_ref = data
                .get("reference")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            payment.mark_paid(tx_ref, snapshot, timenow);
            let mut order = self.repo_order.fetch(payment.order_id.as_str()).await?;
            if order.status == OrderStatus::Pending {
                order.try_transit(OrderStatus::Success)?;
                self.repo_order.save(order).await?;
            }
        } else {
            payment.mark_failed(snapshot);
        }
        self.repo_payment.save(payment.clone()).await?;
        Ok(PaymentWebhookUcOutput::Processed(payment_present_dto(
            payment,
        )))
    } // end of fn execute
} // end of impl PaymentWebhookUseCase

pub enum CancelPaymentUcOutput {
    Success(PaymentPresentDto),
    NotFound,
    PermissionDeny,
    NotCancellable(String),
}

pub struct CancelPaymentUseCase {
    pub repo_payment: Box<dyn AbsPaymentRepo>,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_product: Box<dyn AbsProductRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CancelPaymentUseCase {
    pub async fn execute(
        self,
        gateway_code: i64,
    ) -> DefaultResult<CancelPaymentUcOutput, AppError> {
        let mut payment = match self.repo_payment.fetch_by_code(gateway_code).await {
            Ok(v) => v,
            Err(e) if e.code == AppErrorCode::PaymentNotExist => {
                return Ok(CancelPaymentUcOutput::NotFound);
            }
            Err(e) => {
                return Err(e);
            }
        };
        if payment.owner_id != self.auth_claim.profile {
            return Ok(CancelPaymentUcOutput::PermissionDeny);
        }
        if let Err(e) = payment.try_cancel() {
            return Ok(CancelPaymentUcOutput::NotCancellable(
                e.detail.unwrap_or_default(),
            ));
        }
        self.repo_payment.save(payment.clone()).await?;
        // the owning order follows, which also gives claimed stock back
        let mut order = self.repo_order.fetch(payment.order_id.as_str()).await?;
        if order.status == OrderStatus::Pending {
            order.try_transit(OrderStatus::Cancel)?;
            self.repo_order.save(order.clone()).await?;
            self.repo_product
                .try_return(restore_stock_cb, &order)
                .await?;
        }
        Ok(CancelPaymentUcOutput::Success(payment_present_dto(payment)))
    } // end of fn execute
} // end of impl CancelPaymentUseCase
