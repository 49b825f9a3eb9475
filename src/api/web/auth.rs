use axum::debug_handler;
use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{LoginReqDto, LoginRespDto};
use crate::logging::{app_log_event, AppLogLevel};
use crate::usecase::{LoginUcOutput, LoginUseCase};
use crate::AppSharedState;

use super::{error_response, fail_response, success_response};

#[debug_handler(state = AppSharedState)]
pub(super) async fn login_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<LoginReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let uc = LoginUseCase {
        keystore: _appstate.auth_keystore(),
    };
    match uc.execute(req_body).await {
        Ok(LoginUcOutput::Success(resp)) => {
            success_response::<LoginRespDto>(HttpStatusCode::OK, "logged-in", Some(resp))
        }
        Ok(LoginUcOutput::InvalidCredential) => fail_response::<()>(
            HttpStatusCode::UNAUTHORIZED,
            "invalid-credential",
            None,
        ),
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "login-failure {:?}", e);
            error_response()
        }
    }
} // end of fn login_handler
