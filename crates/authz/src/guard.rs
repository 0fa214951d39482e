use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_kernel::settings::{AuthMode, AuthSettings};

use crate::bearer::bearer_token;

/// Lifetime of an issued admin token.
pub const TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Submitted secret does not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No admin secret is configured, so nobody can log in.
    #[error("admin secret is not configured")]
    NotConfigured,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Payload of an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and checks the single admin identity's bearer tokens.
#[derive(Clone)]
pub struct AuthGuard {
    mode: AuthMode,
    admin_secret: Option<String>,
    keys: Option<Keys>,
}

impl AuthGuard {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let admin_secret = settings
            .admin_secret
            .clone()
            .filter(|secret| !secret.is_empty());
        let signing_secret = settings
            .token_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .or_else(|| admin_secret.clone());

        let keys = signing_secret.map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self {
            mode: settings.mode,
            admin_secret,
            keys,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Whether anyone can log in at all.
    pub fn is_configured(&self) -> bool {
        self.admin_secret.is_some()
    }

    /// Exchange the submitted shared secret for a bearer token.
    pub fn login(&self, submitted: &str) -> Result<String, AuthError> {
        let secret = self.admin_secret.as_deref().ok_or(AuthError::NotConfigured)?;
        if submitted != secret {
            return Err(AuthError::InvalidCredentials);
        }

        match self.mode {
            AuthMode::Signed => self.sign_at(now_secs()),
            AuthMode::SharedSecret => Ok(secret.to_string()),
        }
    }

    /// Check a raw token. Expired, malformed, and foreign tokens all yield `None`.
    pub fn verify(&self, token: &str) -> Option<AdminClaims> {
        if token.is_empty() {
            return None;
        }

        match self.mode {
            AuthMode::Signed => {
                let keys = self.keys.as_ref()?;
                let mut validation = Validation::new(Algorithm::HS256);
                validation.leeway = 0;

                let data = decode::<AdminClaims>(token, &keys.decoding, &validation).ok()?;
                data.claims.admin.then_some(data.claims)
            }
            AuthMode::SharedSecret => {
                let secret = self.admin_secret.as_deref()?;
                (token == secret).then_some(AdminClaims {
                    admin: true,
                    iat: None,
                    exp: None,
                })
            }
        }
    }

    /// Check a raw `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Option<AdminClaims> {
        self.verify(bearer_token(header?))
    }

    pub(crate) fn sign_at(&self, issued_at: i64) -> Result<String, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::NotConfigured)?;
        let claims = AdminClaims {
            admin: true,
            iat: Some(issued_at),
            exp: Some(issued_at + TOKEN_TTL_SECS),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(mode: AuthMode, secret: Option<&str>) -> AuthGuard {
        AuthGuard::from_settings(&AuthSettings {
            mode,
            admin_secret: secret.map(String::from),
            token_secret: None,
        })
    }

    #[test]
    fn login_with_correct_secret_yields_verifiable_token() {
        let guard = guard(AuthMode::Signed, Some("s3cret"));
        let token = guard.login("s3cret").unwrap();

        let claims = guard.verify(&token).unwrap();
        assert!(claims.admin);
        assert_eq!(claims.exp.unwrap() - claims.iat.unwrap(), TOKEN_TTL_SECS);
        assert!(guard.verify_header(Some(&format!("Bearer {}", token))).is_some());
    }

    #[test]
    fn login_with_wrong_secret_fails() {
        let guard = guard(AuthMode::Signed, Some("s3cret"));
        assert!(matches!(
            guard.login("guess"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn login_without_configured_secret_fails() {
        let guard = guard(AuthMode::Signed, None);
        assert!(!guard.is_configured());
        assert!(matches!(guard.login(""), Err(AuthError::NotConfigured)));
        assert!(guard.verify("anything").is_none());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let guard = guard(AuthMode::Signed, Some("s3cret"));
        let nine_hours_ago = now_secs() - 9 * 60 * 60;
        let token = guard.sign_at(nine_hours_ago).unwrap();
        assert!(guard.verify(&token).is_none());

        let seven_hours_ago = now_secs() - 7 * 60 * 60;
        let token = guard.sign_at(seven_hours_ago).unwrap();
        assert!(guard.verify(&token).is_some());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let ours = guard(AuthMode::Signed, Some("s3cret"));
        let theirs = guard(AuthMode::Signed, Some("other"));
        let token = theirs.login("other").unwrap();
        assert!(ours.verify(&token).is_none());
    }

    #[test]
    fn garbage_and_missing_headers_are_rejected() {
        let guard = guard(AuthMode::Signed, Some("s3cret"));
        assert!(guard.verify("not-a-jwt").is_none());
        assert!(guard.verify_header(None).is_none());
        assert!(guard.verify_header(Some("Bearer ")).is_none());
    }

    #[test]
    fn token_secret_overrides_signing_key() {
        let guard = AuthGuard::from_settings(&AuthSettings {
            mode: AuthMode::Signed,
            admin_secret: Some("login".into()),
            token_secret: Some("signing".into()),
        });
        let token = guard.login("login").unwrap();
        assert!(guard.verify(&token).is_some());

        let signed_with_login = guard_with_key("login").sign_at(now_secs()).unwrap();
        assert!(guard.verify(&signed_with_login).is_none());
    }

    fn guard_with_key(secret: &str) -> AuthGuard {
        guard(AuthMode::Signed, Some(secret))
    }

    #[test]
    fn shared_secret_mode_compares_raw_token() {
        let guard = guard(AuthMode::SharedSecret, Some("dev"));
        assert_eq!(guard.login("dev").unwrap(), "dev");
        assert!(guard.verify_header(Some("Bearer dev")).is_some());
        assert!(guard.verify_header(Some("Bearer devx")).is_none());
    }
}
