use std::result::Result as DefaultResult;

use serde_json::json;
use sha2::{Digest, Sha256};

use fieldmart::confidentiality::AbstractConfidentiality;
use fieldmart::error::AppError;
use fieldmart::{AppAuthCfg, AppAuthKeystore, AppAuthRole};

struct MockConfidential {
    payload: String,
}
impl AbstractConfidentiality for MockConfidential {
    fn try_get_payload(&self, _id: &str) -> DefaultResult<String, AppError> {
        Ok(self.payload.clone())
    }
}

fn ut_passwd_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn ut_keystore() -> AppAuthKeystore {
    let payload = json!({
        "secret": "ut-signing-secret-0b12",
        "users": [
            {
                "profile": 188,
                "username": "admin",
                "passwd_salt": "s4lt-a",
                "passwd_digest": ut_passwd_digest("s4lt-a", "t0p-secret"),
                "role": "admin"
            },
            {
                "profile": 124,
                "username": "khach-hang",
                "passwd_salt": "s4lt-b",
                "passwd_digest": ut_passwd_digest("s4lt-b", "letmein"),
                "role": "customer"
            }
        ]
    })
    .to_string();
    let cfg = AppAuthCfg {
        token_ttl_minutes: 30,
        confidential_path: "backend_apps/secrets/fieldmart/auth".to_string(),
    };
    let cfdntl = MockConfidential { payload };
    AppAuthKeystore::try_build(&cfg, &cfdntl).unwrap()
}

#[test]
fn token_roundtrip() {
    let ks = ut_keystore();
    let token = ks.issue_token(188, AppAuthRole::Admin).unwrap();
    let claim = ks.validate_token(token.as_str()).unwrap();
    assert_eq!(claim.profile, 188);
    assert!(claim.contain_role(AppAuthRole::Admin));
    assert!(!claim.contain_role(AppAuthRole::Customer));
    assert!(claim.exp > claim.iat);
}

#[test]
fn garbled_token_rejected() {
    let ks = ut_keystore();
    assert!(ks.validate_token("not.a.token").is_err());
    let mut token = ks.issue_token(124, AppAuthRole::Customer).unwrap();
    token.push('x');
    assert!(ks.validate_token(token.as_str()).is_err());
}

#[test]
fn credential_check() {
    let ks = ut_keystore();
    let entry = ks.authenticate("admin", "t0p-secret").unwrap();
    assert_eq!(entry.profile, 188);
    assert_eq!(entry.role, AppAuthRole::Admin);
    assert!(ks.authenticate("admin", "wrong-password").is_none());
    assert!(ks.authenticate("no-such-user", "t0p-secret").is_none());
    let entry = ks.authenticate("khach-hang", "letmein").unwrap();
    assert_eq!(entry.profile, 124);
}
