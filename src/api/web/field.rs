use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{
    FieldCreateReqDto, FieldPresentDto, SubFieldCreateReqDto, SubFieldPresentDto,
    SubFieldStatusReqDto,
};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_field;
use crate::usecase::{
    CreateFieldUseCase, CreateSubFieldUseCase, DiscardFieldUseCase, FacilityUcOutput,
    FieldDetailUseCase, ListFieldsUseCase, SubFieldUcOutput, UpdateSubFieldStatusUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::{error_response, fail_response, success_response, WebApiRespPayload};

fn facility_resp(output: FacilityUcOutput, ok_code: HttpStatusCode, ok_message: &str) -> WebApiRespPayload {
    match output {
        FacilityUcOutput::Success(dto) => {
            success_response::<FieldPresentDto>(ok_code, ok_message, Some(dto))
        }
        FacilityUcOutput::Collection(dtos) => {
            success_response::<Vec<FieldPresentDto>>(ok_code, ok_message, Some(dtos))
        }
        FacilityUcOutput::PermissionDeny => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
        FacilityUcOutput::NotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "field-not-found", None)
        }
    }
}

fn subfield_resp(output: SubFieldUcOutput, ok_code: HttpStatusCode, ok_message: &str) -> WebApiRespPayload {
    match output {
        SubFieldUcOutput::Success(dto) => {
            success_response::<SubFieldPresentDto>(ok_code, ok_message, Some(dto))
        }
        SubFieldUcOutput::PermissionDeny => {
            fail_response::<()>(HttpStatusCode::FORBIDDEN, "permission-denied", None)
        }
        SubFieldUcOutput::FieldNotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "field-not-found", None)
        }
        SubFieldUcOutput::SubFieldNotFound => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "subfield-not-found", None)
        }
        SubFieldUcOutput::BadStatusLabel(label) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("unknown-status:{}", label).as_str(),
            None,
        ),
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<FieldCreateReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = CreateFieldUseCase {
        repo_field,
        auth_claim: authed,
    };
    match uc.execute(req_body).await {
        Ok(output) => facility_resp(output, HttpStatusCode::CREATED, "field-created"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = ListFieldsUseCase { repo_field };
    match uc.execute().await {
        Ok(output) => facility_resp(output, HttpStatusCode::OK, "fields-listed"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn fetch_handler(
    ExtractPath(field_id): ExtractPath<u64>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = FieldDetailUseCase { repo_field };
    match uc.execute(field_id).await {
        Ok(output) => facility_resp(output, HttpStatusCode::OK, "field-found"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard_handler(
    ExtractPath(field_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = DiscardFieldUseCase {
        repo_field,
        auth_claim: authed,
    };
    match uc.execute(field_id).await {
        Ok(output) => facility_resp(output, HttpStatusCode::OK, "field-discarded"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_subfield_handler(
    ExtractPath(field_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<SubFieldCreateReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = CreateSubFieldUseCase {
        repo_field,
        auth_claim: authed,
    };
    match uc.execute(field_id, req_body).await {
        Ok(output) => subfield_resp(output, HttpStatusCode::CREATED, "subfield-created"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn update_subfield_status_handler(
    ExtractPath(sub_field_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<SubFieldStatusReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let repo_field = match app_repo_field(_appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init-error {:?}", e);
            return error_response();
        }
    };
    let uc = UpdateSubFieldStatusUseCase {
        repo_field,
        auth_claim: authed,
    };
    match uc.execute(sub_field_id, req_body.status).await {
        Ok(output) => subfield_resp(output, HttpStatusCode::OK, "subfield-status-updated"),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
}
