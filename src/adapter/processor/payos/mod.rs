mod client;
mod mock;
mod resources;

use std::boxed::Box;
use std::result::Result;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use hmac::{Hmac, Mac};
use hyper::Method;
use serde::Deserialize;
use serde_json::Value as JsnVal;
use sha2::Sha256;
use tokio_native_tls::{native_tls, TlsConnector};

use crate::confidentiality::AbstractConfidentiality;
use crate::config::AppPaymentGatewayCfg;
use crate::constant::GATEWAY_RESULT_CODE_OK;
use crate::logging::AppLogContext;

use self::client::AppPayosClient;
use self::resources::{PayosPaymentLinkReqDto, PayosRespDto};
use super::base_client::BaseClientError;
use super::{AppProcessorErrorReason, AppProcessorPayLinkReq, AppProcessorPayLinkResult};

pub(super) use mock::MockPayosContext;

const PAYMENT_REQUEST_RESOURCE: &str = "/payment-requests";

#[async_trait]
pub(super) trait AbstPayosContext: Send + Sync {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorErrorReason>;

    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool;
}

#[derive(Deserialize, Clone)]
pub(super) struct PayosCredential {
    pub client_id: String,
    pub api_key: String,
    pub checksum_key: String,
}

/// canonical signing string of a payment-link request, the five signed
/// fields joined `key=value` with `&`, keys in alphabetical order
pub fn payment_link_base_string(
    amount: u64,
    cancel_url: &str,
    description: &str,
    order_code: i64,
    return_url: &str,
) -> String {
    format!(
        "amount={}&cancelUrl={}&description={}&orderCode={}&returnUrl={}",
        amount, cancel_url, description, order_code, return_url
    )
}

pub fn hmac_sha256_hex(base: &str, checksum_key: &str) -> Result<String, AppProcessorErrorReason> {
    let mut mac = Hmac::<Sha256>::new_from_slice(checksum_key.as_bytes())
        .map_err(|_e| AppProcessorErrorReason::CredentialCorrupted)?;
    mac.update(base.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// deterministic JSON rendering with object keys emitted in sorted order,
/// both sides of the webhook digest have to agree on byte layout
pub fn canonical_json(v: &JsnVal) -> String {
    match v {
        JsnVal::Object(map) => {
            let mut keys = map.keys().collect::<Vec<&String>>();
            keys.sort();
            let inner = keys
                .into_iter()
                .map(|k| {
                    let label = serde_json::to_string(k).unwrap();
                    format!("{}:{}", label, canonical_json(map.get(k).unwrap()))
                })
                .collect::<Vec<String>>()
                .join(",");
            format!("{{{}}}", inner)
        }
        JsnVal::Array(elms) => {
            let inner = elms
                .iter()
                .map(canonical_json)
                .collect::<Vec<String>>()
                .join(",");
            format!("[{}]", inner)
        }
        _scalar => serde_json::to_string(v).unwrap(),
    }
} // end of fn canonical_json

/// recompute the digest over the payload with its `signature` member
/// stripped, compare against the claimed signature. Returns false on any
/// internal failure, a broken payload must never be accepted.
pub fn verify_webhook_signature(signature: &str, payload: &JsnVal, checksum_key: &str) -> bool {
    let obj = match payload {
        JsnVal::Object(m) => {
            let mut cloned = m.clone();
            let _claimed = cloned.remove("signature");
            cloned
        }
        _others => {
            return false;
        }
    };
    let serialized = canonical_json(&JsnVal::Object(obj));
    match hmac_sha256_hex(serialized.as_str(), checksum_key) {
        Ok(expect) => expect == signature,
        Err(_e) => false,
    }
}

pub(super) struct AppProcessorPayosCtx {
    host: String,
    port: u16,
    credential: PayosCredential,
    secure_connector: TlsConnector,
    logctx: Arc<AppLogContext>,
}

impl AppProcessorPayosCtx {
    pub(super) fn try_build(
        cfg: &AppPaymentGatewayCfg,
        cfdntl: Arc<Box<dyn AbstractConfidentiality>>,
        logctx: Arc<AppLogContext>,
    ) -> Result<Box<dyn AbstPayosContext>, AppProcessorErrorReason> {
        let serial = cfdntl
            .try_get_payload(cfg.confidential_path.as_str())
            .map_err(|_e| AppProcessorErrorReason::MissingCredential)?;
        let credential = serde_json::from_str::<PayosCredential>(serial.as_str())
            .map_err(|_e| AppProcessorErrorReason::CredentialCorrupted)?;
        let low_lvl = native_tls::TlsConnector::new().map_err(|e| {
            AppProcessorErrorReason::LowLvlNet(BaseClientError { reason: e.into() })
        })?;
        let obj = Self {
            host: cfg.host.clone(),
            port: cfg.port,
            credential,
            secure_connector: TlsConnector::from(low_lvl),
            logctx,
        };
        Ok(Box::new(obj))
    } // end of fn try_build
} // end of impl AppProcessorPayosCtx

#[async_trait]
impl AbstPayosContext for AppProcessorPayosCtx {
    async fn create_payment_link(
        &self,
        req: AppProcessorPayLinkReq,
    ) -> Result<AppProcessorPayLinkResult, AppProcessorErrorReason> {
        let base = payment_link_base_string(
            req.amount,
            req.cancel_url.as_str(),
            req.description.as_str(),
            req.gateway_code,
            req.return_url.as_str(),
        );
        let signature = hmac_sha256_hex(base.as_str(), self.credential.checksum_key.as_str())?;
        let body = PayosPaymentLinkReqDto {
            order_code: req.gateway_code,
            amount: req.amount,
            description: req.description,
            return_url: req.return_url,
            cancel_url: req.cancel_url,
            signature,
        };
        let mut _client = AppPayosClient::try_build(
            self.logctx.clone(),
            &self.secure_connector,
            self.host.clone(),
            self.port,
            self.credential.client_id.clone(),
            self.credential.api_key.clone(),
        )
        .await
        .map_err(AppProcessorErrorReason::from)?;
        let resp = _client
            .execute_json::<PayosRespDto, PayosPaymentLinkReqDto>(
                PAYMENT_REQUEST_RESOURCE,
                Method::POST,
                &body,
            )
            .await
            .map_err(AppProcessorErrorReason::from)?;
        if resp.code.as_str() != GATEWAY_RESULT_CODE_OK {
            return Err(AppProcessorErrorReason::GatewayDecline(resp.desc));
        }
        let data = resp.data.ok_or(AppProcessorErrorReason::CorruptedResponse(
            "missing-data".to_string(),
        ))?;
        let expired_time = data
            .expired_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|t| t.fixed_offset());
        Ok(AppProcessorPayLinkResult {
            link_id: data.payment_link_id,
            checkout_url: data.checkout_url,
            qr_code: data.qr_code,
            expired_time,
        })
    } // end of fn create_payment_link

    fn verify_webhook_signature(&self, signature: &str, payload: &JsnVal) -> bool {
        verify_webhook_signature(signature, payload, self.credential.checksum_key.as_str())
    }
} // end of impl AbstPayosContext for AppProcessorPayosCtx
