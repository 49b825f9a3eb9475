use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::api::web::dto::{LoginReqDto, LoginRespDto};
use crate::error::AppError;
use crate::AppAuthKeystore;

pub enum LoginUcOutput {
    Success(LoginRespDto),
    InvalidCredential,
}

pub struct LoginUseCase {
    pub keystore: Arc<AppAuthKeystore>,
}

impl LoginUseCase {
    pub async fn execute(self, req: LoginReqDto) -> DefaultResult<LoginUcOutput, AppError> {
        let entry = match self
            .keystore
            .authenticate(req.username.as_str(), req.password.as_str())
        {
            Some(v) => v,
            None => {
                return Ok(LoginUcOutput::InvalidCredential);
            }
        };
        let (profile, role) = (entry.profile, entry.role.clone());
        let access_token = self.keystore.issue_token(profile, role.clone())?;
        let role_label = serde_json::to_value(&role)
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_default();
        Ok(LoginUcOutput::Success(LoginRespDto {
            access_token,
            profile,
            role: role_label,
        }))
    }
}
