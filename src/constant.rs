pub mod app_meta {
    pub const LABEL: &str = "fieldmart";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_ORDER_LINES_PER_REQUEST: usize = 65535;
    // upper bound accepted by the payment gateway, in VND
    pub const MAX_PAYMENT_AMOUNT_VND: u64 = 500_000_000;
}

pub(crate) mod api {
    use crate::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const AUTH_LOGIN: WebApiHdlrLabel = "auth_login";
        pub(crate) const CREATE_NEW_ORDER: WebApiHdlrLabel = "create_new_order";
        pub(crate) const ACCESS_EXISTING_ORDER: WebApiHdlrLabel = "access_existing_order";
        pub(crate) const LIST_OWNER_ORDERS: WebApiHdlrLabel = "list_owner_orders";
        pub(crate) const UPDATE_ORDER_STATUS: WebApiHdlrLabel = "update_order_status";
        pub(crate) const CREATE_PAYMENT_LINK: WebApiHdlrLabel = "create_payment_link";
        pub(crate) const CANCEL_PAYMENT: WebApiHdlrLabel = "cancel_payment";
        pub(crate) const PAYMENT_GATEWAY_WEBHOOK: WebApiHdlrLabel = "payment_gateway_webhook";
        pub(crate) const CREATE_BOOKING: WebApiHdlrLabel = "create_booking";
        pub(crate) const LIST_BOOKING_SLOTS: WebApiHdlrLabel = "list_booking_slots";
        pub(crate) const PRODUCT_COLLECTION: WebApiHdlrLabel = "product_collection";
        pub(crate) const MAINTAIN_PRODUCT: WebApiHdlrLabel = "maintain_product";
        pub(crate) const CATEGORY_COLLECTION: WebApiHdlrLabel = "category_collection";
        pub(crate) const FIELD_COLLECTION: WebApiHdlrLabel = "field_collection";
        pub(crate) const ACCESS_FIELD: WebApiHdlrLabel = "access_field";
        pub(crate) const CREATE_SUBFIELD: WebApiHdlrLabel = "create_subfield";
        pub(crate) const UPDATE_SUBFIELD_STATUS: WebApiHdlrLabel = "update_subfield_status";
    }
} // end of inner-mod api

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

// result code the payment gateway reports on success, both in the
// payment-link response and in the inner webhook payload
pub const GATEWAY_RESULT_CODE_OK: &str = "00";

pub(crate) mod logging {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
