use std::marker::{Send, Sync};
use std::result::Result;
use std::sync::Arc;

use hyper::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use hyper::{Body as HyperBody, Method};
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use tokio_native_tls::TlsConnector;

use crate::logging::AppLogContext;

use super::super::base_client::{BaseClient, BaseClientError, BaseClientErrorReason};

const API_VERSION: &str = "v2";

// gateway authenticates every request with this header pair
const HDR_CLIENT_ID: &str = "x-client-id";
const HDR_API_KEY: &str = "x-api-key";

pub(super) struct AppPayosClient {
    client_id: String,
    api_key: String,
    _base_client: BaseClient,
}

impl AppPayosClient {
    pub(super) async fn try_build(
        logctx: Arc<AppLogContext>,
        secure_connector: &TlsConnector,
        host: String,
        port: u16,
        client_id: String,
        api_key: String,
    ) -> Result<Self, BaseClientError> {
        let _base_client = BaseClient::try_build(logctx, secure_connector, host, port).await?;
        Ok(Self {
            client_id,
            api_key,
            _base_client,
        })
    }

    pub(super) async fn execute_json<D, S>(
        &mut self,
        resource_path: &str,
        method: Method,
        body_obj: &S,
    ) -> Result<D, BaseClientError>
    where
        D: DeserializeOwned + Send + 'static,
        S: Serialize + Send + 'static,
    {
        let hdr_parse = |v: &str, label: &str| {
            HeaderValue::from_str(v).map_err(|_e| BaseClientError {
                reason: BaseClientErrorReason::HttpRequest(format!("{label}-header-parse-fail")),
            })
        };
        let headers = vec![
            (
                HeaderName::from_static(HDR_CLIENT_ID),
                hdr_parse(self.client_id.as_str(), "client-id")?,
            ),
            (
                HeaderName::from_static(HDR_API_KEY),
                hdr_parse(self.api_key.as_str(), "api-key")?,
            ),
            (ACCEPT, HeaderValue::from_str("application/json").unwrap()),
            (
                CONTENT_TYPE,
                HeaderValue::from_str("application/json").unwrap(),
            ),
        ];
        let raw_body = serde_json::to_vec(body_obj).map_err(|e| BaseClientError {
            reason: BaseClientErrorReason::SerialiseFailure(e.to_string()),
        })?;
        let uri = "/".to_string() + API_VERSION + resource_path;
        let (raw_resp, status) = self
            ._base_client
            .execute(uri.as_str(), method, HyperBody::from(raw_body), headers)
            .await?;
        serde_json::from_slice::<D>(&raw_resp).map_err(|e| {
            let detail = format!("{}, raw-size:{}", e, raw_resp.len());
            BaseClientError {
                reason: BaseClientErrorReason::DeserialiseFailure(
                    Box::new(detail),
                    status.as_u16(),
                ),
            }
        })
    } // end of fn execute_json
} // end of impl AppPayosClient
