mod base_client;
pub mod payos;

use std::boxed::Box;
use std::marker::{Send, Sync};
use std::result::Result;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value as JsnVal;

use crate::confidentiality::AbstractConfidentiality;
use crate::config::AppPaymentGatewayCfg;
use crate::logging::AppLogContext;

pub use self::base_client::{BaseClientError, BaseClientErrorReason};
use self::payos::{AbstPayosContext, AppProcessorPayosCtx, MockPayosContext};

#[derive(Debug)]
pub enum AppProcessorErrorReason {
    InvalidConfig,
    MissingCredential,
    CredentialCorrupted,
    // the gateway answered with a non-success result code, keep its
    // description for the client-facing error
    GatewayDecline(String),
    CorruptedResponse(String),
    LowLvlNet(BaseClientError),
    NotImplemented,
}

#[derive(Debug)]
pub enum AppProcessorFnLabel {
    TryBuild,
    CreatePaymentLink,
}

#[derive(Debug)]
pub struct AppProcessorError {
    pub reason: AppProcessorErrorReason,
    pub fn_label: AppProcessorFnLabel,
}

impl From<BaseClientError> for AppProcessorErrorReason {
    fn from(value: BaseClientError) -> Self {
        Self::LowLvlNet(value)
    }
}

impl From<AppProcessorError> for crate::error::AppError {
    fn from(value: AppProcessorError) -> Self {
        Self {
            code: crate::error::AppErrorCode::RemoteGatewayFailure,
            detail: Some(format!("{:?}", value)),
        }
    }
}

/// request handed to the gateway when a buyer asks for a checkout link
pub struct AppProcessorPayLinkReq {
    pub gateway_code: i64,
    pub amount: u64,
    pub description: String,
    pub return_url: String,
    pub cancel_url: String,
}

pub struct AppProcessorPayLinkResult {
    pub link_id: String,
    pub checkout_url: String,
    pub qr_code: String,
    pub expired_time: Option<DateTime<FixedOffset>>,
}

#[async_trait]
pub trait AbstractPaymentProcessor: Send + Sync {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorError>;

    // fails closed, any verification error counts as an invalid signature
    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool;
}

struct AppProcessorContext {
    _payos: Box<dyn AbstPayosContext>,
    _logctx: Arc<AppLogContext>,
}

#[async_trait]
impl AbstractPaymentProcessor for AppProcessorContext {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorError> {
        self._payos
            .create_payment_link(req)
            .await
            .map_err(|reason| AppProcessorError {
                reason,
                fn_label: AppProcessorFnLabel::CreatePaymentLink,
            })
    }

    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool {
        self._payos.verify_webhook_signature(signature, payload)
    }
}

pub(crate) fn app_processor_context(
    cfg: &AppPaymentGatewayCfg,
    cfdntl: Arc<Box<dyn AbstractConfidentiality>>,
    logctx: Arc<AppLogContext>,
) -> Result<Box<dyn AbstractPaymentProcessor>, AppProcessorError> {
    let _payos: Box<dyn AbstPayosContext> = if cfg.mock {
        MockPayosContext::build(cfg)
    } else {
        AppProcessorPayosCtx::try_build(cfg, cfdntl, logctx.clone()).map_err(|reason| {
            AppProcessorError {
                reason,
                fn_label: AppProcessorFnLabel::TryBuild,
            }
        })?
    };
    let proc = AppProcessorContext {
        _payos,
        _logctx: logctx,
    };
    Ok(Box::new(proc))
}
