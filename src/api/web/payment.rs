use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;
use serde_json::Value as JsnVal;

use crate::api::web::dto::{PaymentCreateReqDto, PaymentPresentDto};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_order, app_repo_payment, app_repo_product};
use crate::usecase::{
    CancelPaymentUcOutput, CancelPaymentUseCase, CreatePaymentUcError, CreatePaymentUseCase,
    PaymentWebhookUcOutput, PaymentWebhookUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::{error_response, fail_response, success_response};

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<PaymentCreateReqDto>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_payment(ds).await,
    );
    let (repo_order, repo_payment) = match results {
        (Ok(r0), Ok(r1)) => (r0, r1),
        _others => {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}",
                usr_id
            );
            return error_response();
        }
    };
    let gw_cfg = &_appstate.config().api_server.payment_gateway;
    let uc = CreatePaymentUseCase {
        repo_order,
        repo_payment,
        processors: _appstate.processor_context(),
        auth_claim: authed,
        return_url: gw_cfg.return_url.clone(),
        cancel_url: gw_cfg.cancel_url.clone(),
        logctx: log_ctx.clone(),
    };
    match uc.execute(req_body).await {
        Ok(value) => success_response::<PaymentPresentDto>(
            HttpStatusCode::CREATED,
            "payment-link-created",
            Some(value),
        ),
        Err(uce) => match uce {
            CreatePaymentUcError::OrderNotFound => {
                fail_response::<()>(HttpStatusCode::NOT_FOUND, "order-not-found", None)
            }
            CreatePaymentUcError::OwnerMismatch => {
                fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
            }
            CreatePaymentUcError::OrderNotPending(s) => fail_response::<()>(
                HttpStatusCode::BAD_REQUEST,
                format!("order-not-pending:{}", s).as_str(),
                None,
            ),
            CreatePaymentUcError::MethodNotGateway(s) => fail_response::<()>(
                HttpStatusCode::BAD_REQUEST,
                format!("order-method-not-gateway:{}", s).as_str(),
                None,
            ),
            CreatePaymentUcError::AlreadyExists(code) => fail_response::<()>(
                HttpStatusCode::CONFLICT,
                format!("payment-exists:{}", code).as_str(),
                None,
            ),
            CreatePaymentUcError::AmountOutOfRange(detail) => fail_response::<()>(
                HttpStatusCode::BAD_REQUEST,
                format!("amount-out-of-range, {}", detail).as_str(),
                None,
            ),
            CreatePaymentUcError::GatewayDecline(desc) => fail_response::<()>(
                HttpStatusCode::BAD_REQUEST,
                format!("gateway-declined, {}", desc).as_str(),
                None,
            ),
            CreatePaymentUcError::Server(e) => {
                app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
                error_response()
            }
        },
    }
} // end of fn create_handler

// public endpoint, authenticated only by the gateway signature inside the
// payload, never by a bearer token
#[debug_handler(state = AppSharedState)]
pub(super) async fn webhook_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(payload): ExtractJson<JsnVal>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_payment(ds.clone()).await,
        app_repo_order(ds).await,
    );
    let (repo_payment, repo_order) = match results {
        (Ok(r0), Ok(r1)) => (r0, r1),
        _others => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure");
            return error_response();
        }
    };
    let uc = PaymentWebhookUseCase {
        repo_payment,
        repo_order,
        processors: _appstate.processor_context(),
        logctx: log_ctx.clone(),
    };
    match uc.execute(payload).await {
        Ok(PaymentWebhookUcOutput::Processed(dto)) => {
            success_response::<PaymentPresentDto>(HttpStatusCode::OK, "webhook-processed", Some(dto))
        }
        // the expected digest never leaves the server
        Ok(PaymentWebhookUcOutput::InvalidSignature) => {
            fail_response::<()>(HttpStatusCode::BAD_REQUEST, "invalid-signature", None)
        }
        Ok(PaymentWebhookUcOutput::MalformedPayload(detail)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("malformed-payload, {}", detail).as_str(),
            None,
        ),
        Ok(PaymentWebhookUcOutput::PaymentNotFound(code)) => fail_response::<()>(
            HttpStatusCode::NOT_FOUND,
            format!("payment-not-found:{}", code).as_str(),
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "webhook-failure {:?}", e);
            error_response()
        }
    }
} // end of fn webhook_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn cancel_handler(
    ExtractPath(gateway_code): ExtractPath<i64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_payment(ds.clone()).await,
        app_repo_order(ds.clone()).await,
        app_repo_product(ds).await,
    );
    let (repo_payment, repo_order, repo_product) = match results {
        (Ok(r0), Ok(r1), Ok(r2)) => (r0, r1, r2),
        _others => {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}",
                usr_id
            );
            return error_response();
        }
    };
    let uc = CancelPaymentUseCase {
        repo_payment,
        repo_order,
        repo_product,
        auth_claim: authed,
    };
    match uc.execute(gateway_code).await {
        Ok(CancelPaymentUcOutput::Success(dto)) => {
            success_response::<PaymentPresentDto>(HttpStatusCode::OK, "payment-cancelled", Some(dto))
        }
        Ok(CancelPaymentUcOutput::NotFound) => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "payment-not-found", None)
        }
        Ok(CancelPaymentUcOutput::PermissionDeny) => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
        Ok(CancelPaymentUcOutput::NotCancellable(detail)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("not-cancellable, {}", detail).as_str(),
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
            error_response()
        }
    }
} // end of fn cancel_handler
