use std::result::Result as DefaultResult;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header::AUTHORIZATION, StatusCode as HttpStatusCode};
use chrono::{Duration, Local as LocalTime};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::confidentiality::AbstractConfidentiality;
use crate::error::{AppError, AppErrorCode};
use crate::{AppAuthCfg, AppSharedState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppAuthRole {
    Admin,
    Customer,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AppAuthedClaim {
    // profile ID of the authenticated user
    pub profile: u32,
    pub role: AppAuthRole,
    pub iat: i64,
    pub exp: i64,
}

impl AppAuthedClaim {
    pub fn contain_role(&self, expect: AppAuthRole) -> bool {
        self.role == expect
    }
}

// login credential entries live in the confidentiality store together with
// the token-signing secret, there is no separate user collection
#[derive(Deserialize)]
pub struct AppAuthUserEntry {
    pub profile: u32,
    pub username: String,
    pub passwd_salt: String,
    // hex sha-256 of (salt || password)
    pub passwd_digest: String,
    pub role: AppAuthRole,
}

#[derive(Deserialize)]
struct AppAuthSecretSet {
    secret: String,
    users: Vec<AppAuthUserEntry>,
}

pub struct AppAuthKeystore {
    encode_key: EncodingKey,
    decode_key: DecodingKey,
    token_ttl: Duration,
    users: Vec<AppAuthUserEntry>,
}

impl AppAuthKeystore {
    pub fn try_build(
        cfg: &AppAuthCfg,
        cfdntl: &dyn AbstractConfidentiality,
    ) -> DefaultResult<Self, AppError> {
        let serial = cfdntl.try_get_payload(cfg.confidential_path.as_str())?;
        let secretset =
            serde_json::from_str::<AppAuthSecretSet>(serial.as_str()).map_err(|e| AppError {
                code: AppErrorCode::InvalidJsonFormat,
                detail: Some(format!("auth-secret, {}", e)),
            })?;
        let raw = secretset.secret.as_bytes();
        Ok(Self {
            encode_key: EncodingKey::from_secret(raw),
            decode_key: DecodingKey::from_secret(raw),
            token_ttl: Duration::minutes(cfg.token_ttl_minutes as i64),
            users: secretset.users,
        })
    }

    pub fn issue_token(&self, profile: u32, role: AppAuthRole) -> DefaultResult<String, AppError> {
        let t0 = LocalTime::now();
        let claim = AppAuthedClaim {
            profile,
            role,
            iat: t0.timestamp(),
            exp: (t0 + self.token_ttl).timestamp(),
        };
        encode(&JwtHeader::new(Algorithm::HS256), &claim, &self.encode_key).map_err(|e| AppError {
            code: AppErrorCode::CryptoFailure,
            detail: Some(e.to_string()),
        })
    }

    pub fn validate_token(&self, token: &str) -> DefaultResult<AppAuthedClaim, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // `sub` / `aud` are not part of the claim shape
        validation.required_spec_claims.clear();
        decode::<AppAuthedClaim>(token, &self.decode_key, &validation)
            .map(|d| d.claims)
            .map_err(|e| AppError {
                code: AppErrorCode::CryptoFailure,
                detail: Some(e.to_string()),
            })
    }

    /// username / password check against the stored credential entries,
    /// `None` keeps the caller from learning which part was wrong
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&AppAuthUserEntry> {
        let entry = self.users.iter().find(|u| u.username == username)?;
        let mut hasher = Sha256::new();
        hasher.update(entry.passwd_salt.as_bytes());
        hasher.update(password.as_bytes());
        let given_digest = hex::encode(hasher.finalize());
        if given_digest == entry.passwd_digest {
            Some(entry)
        } else {
            None
        }
    }
} // end of impl AppAuthKeystore

#[async_trait]
impl FromRequestParts<AppSharedState> for AppAuthedClaim {
    type Rejection = (HttpStatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppSharedState,
    ) -> DefaultResult<Self, Self::Rejection> {
        let reject = |detail: &str| {
            (
                HttpStatusCode::UNAUTHORIZED,
                format!(r#"{{"reason":"{}"}}"#, detail),
            )
        };
        let hdr = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| reject("missing-authorization"))?;
        let raw = hdr.to_str().map_err(|_e| reject("corrupted-header"))?;
        let token = raw
            .strip_prefix("Bearer ")
            .ok_or_else(|| reject("not-bearer-scheme"))?;
        state
            .auth_keystore()
            .validate_token(token)
            .map_err(|_e| reject("invalid-token"))
    }
} // end of impl FromRequestParts for AppAuthedClaim
