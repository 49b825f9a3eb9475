use std::result::Result as DefaultResult;
use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod api;
pub mod confidentiality;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

mod config;
pub use config::{
    ApiServerCfg, AppAuthCfg, AppBasepathCfg, AppConfidentialCfg, AppConfig, AppDataStoreCfg,
    AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg, AppPaymentGatewayCfg,
    WebApiListenCfg, WebApiRouteCfg,
};

mod auth;
pub use auth::{AppAuthKeystore, AppAuthRole, AppAuthUserEntry, AppAuthedClaim};

pub mod adapter;
pub use adapter::datastore;

use adapter::processor::{app_processor_context, AbstractPaymentProcessor};
use confidentiality::AbstractConfidentiality;
use error::AppError;

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
}

// global state shared by all worker threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _auth_keys: Arc<AppAuthKeystore>,
    _processors: Arc<Box<dyn AbstractPaymentProcessor>>,
}

impl AppSharedState {
    pub fn new(
        cfg: AppConfig,
        log: logging::AppLogContext,
        confidential: Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let confidential = Arc::new(confidential);
        let log = Arc::new(log);
        let auth_keys =
            AppAuthKeystore::try_build(&cfg.api_server.auth, confidential.as_ref().as_ref())?;
        let _processors = app_processor_context(
            &cfg.api_server.payment_gateway,
            confidential.clone(),
            log.clone(),
        )?;
        let in_mem = datastore::build_context(&cfg.api_server.data_store).map(Arc::new);
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem });
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _auth_keys: Arc::new(auth_keys),
            _processors: Arc::new(_processors),
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn auth_keystore(&self) -> Arc<AppAuthKeystore> {
        self._auth_keys.clone()
    }

    pub fn processor_context(&self) -> Arc<Box<dyn AbstractPaymentProcessor>> {
        self._processors.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _auth_keys: self._auth_keys.clone(),
            _processors: self._processors.clone(),
        }
    }
}

pub fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv7 is for single-node application. This app needs to consider
    // scalability of multi-node environment, UUIDv8 can be utilized cuz it
    // allows custom ID layout, so few bits of the ID can be assigned to
    // represent each machine/node ID,  rest of that should be timestamp with
    // random byte sequence
    let ts_ctx = NoContext;
    let (secs, nano) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}

// compact numeric identifier for catalog / facility records, carved out of
// the same time-ordered UUID layout
pub fn generate_numeric_id(machine_code: u8) -> u64 {
    let uid = generate_custom_uid(machine_code);
    let bs = uid.into_bytes();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bs[..8]);
    u64::from_be_bytes(buf)
}
