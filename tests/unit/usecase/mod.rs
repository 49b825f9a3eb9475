mod booking;
mod create_order;
mod order_status;
mod payment;

use std::result::Result;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use fieldmart::adapter::processor::payos::verify_webhook_signature;
use fieldmart::adapter::processor::{
    AbstractPaymentProcessor, AppProcessorError, AppProcessorErrorReason, AppProcessorFnLabel,
    AppProcessorPayLinkReq, AppProcessorPayLinkResult,
};
use fieldmart::model::{FieldModel, SubFieldModel, SubFieldStatus};
use fieldmart::repository::{app_repo_field, app_repo_product};
use fieldmart::AppDataStoreContext;

use super::model::ut_product;

pub(crate) const UT_CHECKSUM_KEY: &str = "ut-checksum-key-7f08";

// stand-in for the remote gateway, signs and verifies with a fixed key and
// never touches the network
pub(crate) struct UtProcessor {
    pub decline: Option<String>,
}

#[async_trait]
impl AbstractPaymentProcessor for UtProcessor {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorError> {
        if let Some(desc) = &self.decline {
            return Err(AppProcessorError {
                reason: AppProcessorErrorReason::GatewayDecline(desc.clone()),
                fn_label: AppProcessorFnLabel::CreatePaymentLink,
            });
        }
        Ok(AppProcessorPayLinkResult {
            link_id: format!("plink-{}", req.gateway_code),
            checkout_url: format!("https://pay.gateway.test/web/{}", req.gateway_code),
            qr_code: format!("00020101-utest-{}", req.gateway_code),
            expired_time: None,
        })
    }

    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool {
        verify_webhook_signature(signature, payload, UT_CHECKSUM_KEY)
    }
}

pub(crate) fn ut_processor_ctx(decline: Option<String>) -> Arc<Box<dyn AbstractPaymentProcessor>> {
    let obj: Box<dyn AbstractPaymentProcessor> = Box::new(UtProcessor { decline });
    Arc::new(obj)
}

pub(crate) async fn ut_seed_product(ds: Arc<AppDataStoreContext>, id_: u64, quantity: u32) {
    let repo = app_repo_product(ds).await.unwrap();
    repo.create(ut_product(id_, quantity)).await.unwrap();
}

pub(crate) async fn ut_seed_subfield(
    ds: Arc<AppDataStoreContext>,
    field_id: u64,
    sub_field_id: u64,
) {
    let repo = app_repo_field(ds).await.unwrap();
    let field = FieldModel {
        id_: field_id,
        name: format!("north campus field {field_id}"),
        location: "12 Nguyen Hue".to_string(),
        is_deleted: false,
        is_create: true,
    };
    repo.create(field).await.unwrap();
    let sub = SubFieldModel {
        id_: sub_field_id,
        field_id,
        name: format!("court {sub_field_id}"),
        slot_price: 250_000,
        status: SubFieldStatus::Available,
    };
    repo.create_subfield(sub).await.unwrap();
}
