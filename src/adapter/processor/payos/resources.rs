use serde::{Deserialize, Serialize};

// wire format of the gateway REST API, field names follow its JSON casing

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PayosPaymentLinkReqDto {
    pub order_code: i64,
    pub amount: u64,
    pub description: String,
    pub return_url: String,
    pub cancel_url: String,
    pub signature: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PayosPaymentLinkDataDto {
    pub payment_link_id: String,
    pub checkout_url: String,
    pub qr_code: String,
    #[serde(default)]
    pub expired_at: Option<i64>,
}

#[derive(Deserialize)]
pub(super) struct PayosRespDto {
    pub code: String,
    pub desc: String,
    pub data: Option<PayosPaymentLinkDataDto>,
    #[serde(default)]
    #[allow(dead_code)]
    pub signature: Option<String>,
}
