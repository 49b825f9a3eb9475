use std::boxed::Box;
use std::result::Result;

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use crate::config::AppPaymentGatewayCfg;

use super::{
    verify_webhook_signature, AbstPayosContext, AppProcessorErrorReason, AppProcessorPayLinkReq,
    AppProcessorPayLinkResult,
};

// checksum key the canned gateway signs / verifies with, unit tests sign
// their webhook payloads using the same constant
pub const MOCK_CHECKSUM_KEY: &str = "payos-mock-checksum-key";

pub(crate) struct MockPayosContext {
    checksum_key: String,
}

impl MockPayosContext {
    pub(crate) fn build(_cfg: &AppPaymentGatewayCfg) -> Box<dyn AbstPayosContext> {
        let obj = Self {
            checksum_key: MOCK_CHECKSUM_KEY.to_string(),
        };
        Box::new(obj)
    }
}

#[async_trait]
impl AbstPayosContext for MockPayosContext {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorErrorReason> {
        let out = AppProcessorPayLinkResult {
            link_id: format!("plink-{}", req.gateway_code),
            checkout_url: format!("https://pay.gateway.test/web/{}", req.gateway_code),
            qr_code: format!("00020101-mock-qr-{}", req.gateway_code),
            expired_time: None,
        };
        Ok(out)
    }

    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool {
        verify_webhook_signature(signature, payload, self.checksum_key.as_str())
    }
}
