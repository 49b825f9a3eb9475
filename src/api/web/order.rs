use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{
    OrderCreateReqData, OrderLineCreateErrorDto, OrderPresentDto, OrderStatusUpdateReqDto,
};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_order, app_repo_product};
use crate::usecase::{
    CreateOrderUcError, CreateOrderUseCase, ListOrdersUseCase, OrderDetailUcOutput,
    OrderDetailUseCase, RemoveOrderUseCase, UpdateOrderStatusUcOutput, UpdateOrderStatusUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::{error_response, fail_response, success_response, WebApiRespPayload};

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderCreateReqData>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_product(ds).await,
    );
    let (repo_order, repo_product) = match results {
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
    let uc = CreateOrderUseCase {
        repo_order,
        repo_product,
        auth_claim: authed,
        logctx: log_ctx.clone(),
    };
    match uc.execute(req_body).await {
        Ok(value) => {
            success_response::<OrderPresentDto>(HttpStatusCode::CREATED, "order-created", Some(value))
        }
        Err(CreateOrderUcError::ReqContent(errors)) => fail_response::<Vec<OrderLineCreateErrorDto>>(
            HttpStatusCode::BAD_REQUEST,
            "order-line-rejected",
            Some(errors),
        ),
        Err(CreateOrderUcError::InvalidPaymentMethod(label)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("unknown-payment-method:{}", label).as_str(),
            None,
        ),
        Err(CreateOrderUcError::Server(e)) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
            error_response()
        }
    }
} // end of fn create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_order = match app_repo_order(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = ListOrdersUseCase {
        repo_order,
        auth_claim: authed,
    };
    match uc.execute().await {
        Ok(collection) => success_response::<Vec<OrderPresentDto>>(
            HttpStatusCode::OK,
            "orders-listed",
            Some(collection),
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

fn order_detail_resp(output: OrderDetailUcOutput, ok_message: &str) -> WebApiRespPayload {
    match output {
        OrderDetailUcOutput::Success(dto) => {
            success_response::<OrderPresentDto>(HttpStatusCode::OK, ok_message, Some(dto))
        }
        OrderDetailUcOutput::NotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "order-not-found", None)
        }
        OrderDetailUcOutput::PermissionDeny => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn fetch_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_order = match app_repo_order(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = OrderDetailUseCase {
        repo_order,
        auth_claim: authed,
    };
    match uc.execute(oid).await {
        Ok(output) => order_detail_resp(output, "order-found"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn remove_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_order = match app_repo_order(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = RemoveOrderUseCase {
        repo_order,
        auth_claim: authed,
    };
    match uc.execute(oid).await {
        Ok(output) => order_detail_resp(output, "order-removed"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn update_status_handler(
    ExtractPath(oid): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderStatusUpdateReqDto>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_product(ds).await,
    );
    let (repo_order, repo_product) = match results {
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
    let uc = UpdateOrderStatusUseCase {
        repo_order,
        repo_product,
        auth_claim: authed,
        logctx: log_ctx.clone(),
    };
    match uc.execute(oid, req_body.status).await {
        Ok(UpdateOrderStatusUcOutput::Success(dto)) => {
            success_response::<OrderPresentDto>(HttpStatusCode::OK, "status-updated", Some(dto))
        }
        Ok(UpdateOrderStatusUcOutput::PermissionDeny) => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
        Ok(UpdateOrderStatusUcOutput::NotFound) => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "order-not-found", None)
        }
        Ok(UpdateOrderStatusUcOutput::BadStatusLabel(label)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("unknown-status:{}", label).as_str(),
            None,
        ),
        Ok(UpdateOrderStatusUcOutput::InvalidTransition(detail)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("invalid-transition, {}", detail).as_str(),
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
            error_response()
        }
    }
} // end of fn update_status_handler
