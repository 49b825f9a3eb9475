use std::boxed::Box;
use std::io::{Error as IoError, ErrorKind};
use std::marker::{Send, Sync};
use std::result::Result;
use std::sync::Arc;

use hyper::body::to_bytes;
use hyper::client::conn::{handshake, SendRequest};
use hyper::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use hyper::{Body as HyperBody, Error as HyperError, Method, Request, StatusCode};
use tokio::net::TcpStream;
use tokio_native_tls::{native_tls, TlsConnector};

use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

#[derive(Debug)]
pub enum BaseClientErrorReason {
    TcpNet(ErrorKind, String),
    SysIo(ErrorKind, String),
    Http {
        sender_closed: bool,
        parse_error: bool,
        req_cancelled: bool,
        message_corrupted: bool,
        timeout: bool,
        detail: String,
    },
    HttpRequest(String),
    Tls(String),
    SerialiseFailure(String),
    DeserialiseFailure(Box<String>, u16),
}

impl From<IoError> for BaseClientErrorReason {
    fn from(value: IoError) -> Self {
        let ekind = value.kind();
        match &ekind {
            ErrorKind::TimedOut
            | ErrorKind::AddrInUse
            | ErrorKind::NotConnected
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionAborted => Self::TcpNet(ekind, value.to_string()),
            _others => Self::SysIo(ekind, value.to_string()),
        }
    }
}
impl From<HyperError> for BaseClientErrorReason {
    fn from(value: HyperError) -> Self {
        Self::Http {
            sender_closed: value.is_closed(),
            parse_error: value.is_parse_status() | value.is_parse(),
            timeout: value.is_timeout(),
            message_corrupted: value.is_incomplete_message() | value.is_body_write_aborted(),
            req_cancelled: value.is_canceled(),
            detail: value.to_string(),
        }
    }
}
impl From<native_tls::Error> for BaseClientErrorReason {
    fn from(value: native_tls::Error) -> Self {
        Self::Tls(value.to_string())
    }
}

#[derive(Debug)]
pub struct BaseClientError {
    pub reason: BaseClientErrorReason,
}

pub(super) struct BaseClient {
    req_sender: SendRequest<HyperBody>,
    logctx: Arc<AppLogContext>,
    host: String,
    port: u16,
}

impl BaseClient {
    pub(super) async fn try_build(
        logctx: Arc<AppLogContext>,
        secure_connector: &TlsConnector,
        host: String,
        port: u16,
    ) -> Result<Self, BaseClientError> {
        let logctx_cpy = logctx.clone();
        let tcp_stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| {
                app_log_event!(
                    logctx_cpy,
                    AppLogLevel::ERROR,
                    "tcp-conn-err, {host}:{port}, {:?}",
                    &e
                );
                BaseClientError { reason: e.into() }
            })?;
        let tls_stream = secure_connector
            .connect(host.as_str(), tcp_stream)
            .await
            .map_err(|e| BaseClientError { reason: e.into() })?;
        let (req_sender, connector) = handshake(tls_stream)
            .await
            .map_err(|e| BaseClientError { reason: e.into() })?;
        let host_cpy = host.clone();
        let fut = Box::pin(async move {
            if let Err(e) = connector.await {
                app_log_event!(
                    logctx_cpy,
                    AppLogLevel::WARNING,
                    "remote server: {host_cpy}:{port}, {:?}",
                    e
                );
            }
        });
        let _handle = tokio::spawn(fut);
        Ok(Self {
            req_sender,
            logctx,
            host,
            port,
        })
    } // end of fn try_build

    pub(super) async fn execute(
        &mut self,
        path: &str,
        method: Method,
        body: HyperBody,
        headers: Vec<(HeaderName, HeaderValue)>,
    ) -> Result<(Vec<u8>, StatusCode), BaseClientError> {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .map_err(|e| BaseClientError {
                reason: BaseClientErrorReason::HttpRequest(e.to_string()),
            })?;
        self.append_necessary_headers(req.headers_mut(), headers);
        let logctx_p = &self.logctx;
        let uri_log = req.uri().to_string();
        let resp = self.req_sender.send_request(req).await.map_err(|e| {
            app_log_event!(logctx_p, AppLogLevel::WARNING, "{:?}", e);
            BaseClientError { reason: e.into() }
        })?;
        let status_code = resp.status();
        if status_code.is_client_error() {
            app_log_event!(
                logctx_p,
                AppLogLevel::INFO,
                "server:{}:{}, uri:{}",
                self.host.as_str(),
                self.port,
                uri_log
            );
        } else if status_code.is_server_error() {
            app_log_event!(
                logctx_p,
                AppLogLevel::WARNING,
                "server:{}:{}, uri:{}",
                self.host.as_str(),
                self.port,
                uri_log
            );
        }
        let raw_collected = to_bytes(resp.into_body())
            .await
            .map_err(|e| BaseClientError { reason: e.into() })?;
        Ok((raw_collected.to_vec(), status_code))
    } // end of fn execute

    fn append_necessary_headers(
        &self,
        dst: &mut HeaderMap,
        wr_data: Vec<(HeaderName, HeaderValue)>,
    ) {
        wr_data
            .into_iter()
            .map(|(k, v)| {
                let _old = dst.insert(k, v);
            })
            .count();
        // required in case the remote gateway sits behind reverse proxy
        // server (e.g. CDN)
        let _discarded = dst.insert(HOST, HeaderValue::from_str(self.host.as_str()).unwrap());
    }
} // end of impl BaseClient
