use axum::debug_handler;
use axum::extract::{
    Json as ExtractJson, Path as ExtractPath, Query as ExtractQuery, State as ExtractState,
};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::api::web::dto::{BookingCreateReqDto, BookingPresentDto, SlotPresentDto};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_booking, app_repo_field};
use crate::usecase::{
    BookingSlotsUcOutput, CreateBookingUcOutput, CreateBookingUseCase, ListSlotsUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

use super::{error_response, fail_response, success_response};

#[derive(Deserialize)]
pub(super) struct SlotsQuery {
    day: String,
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    ExtractPath(sub_field_id): ExtractPath<u64>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<BookingCreateReqDto>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_booking(ds.clone()).await,
        app_repo_field(ds).await,
    );
    let (repo_booking, repo_field) = match results {
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
    let uc = CreateBookingUseCase {
        repo_booking,
        repo_field,
        auth_claim: authed,
        logctx: log_ctx.clone(),
    };
    match uc.execute(sub_field_id, req_body).await {
        Ok(CreateBookingUcOutput::Success(dto)) => success_response::<BookingPresentDto>(
            HttpStatusCode::CREATED,
            "booking-created",
            Some(dto),
        ),
        Ok(CreateBookingUcOutput::SubFieldNotFound) => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "subfield-not-found", None)
        }
        Ok(CreateBookingUcOutput::SlotTaken) => {
            fail_response::<()>(HttpStatusCode::CONFLICT, "slot-already-booked", None)
        }
        Ok(CreateBookingUcOutput::InvalidInput(detail)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("invalid-booking-request, {}", detail).as_str(),
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "user:{}, {:?}", usr_id, e);
            error_response()
        }
    }
} // end of fn create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn slots_handler(
    ExtractPath(sub_field_id): ExtractPath<u64>,
    ExtractQuery(q): ExtractQuery<SlotsQuery>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_booking(ds.clone()).await,
        app_repo_field(ds).await,
    );
    let (repo_booking, repo_field) = match results {
        (Ok(r0), Ok(r1)) => (r0, r1),
        _others => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure");
            return error_response();
        }
    };
    let uc = ListSlotsUseCase {
        repo_booking,
        repo_field,
    };
    match uc.execute(sub_field_id, q.day).await {
        Ok(BookingSlotsUcOutput::Success(slots)) => {
            success_response::<Vec<SlotPresentDto>>(HttpStatusCode::OK, "slots-listed", Some(slots))
        }
        Ok(BookingSlotsUcOutput::SubFieldNotFound) => {
            fail_response::<()>(HttpStatusCode::NOT_FOUND, "subfield-not-found", None)
        }
        Ok(BookingSlotsUcOutput::InvalidInput(detail)) => fail_response::<()>(
            HttpStatusCode::BAD_REQUEST,
            format!("invalid-day, {}", detail).as_str(),
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "{:?}", e);
            error_response()
        }
    }
} // end of fn slots_handler
