use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::signing_key::SigningKey;

/// Access token claims.
///
/// `sub` is the user's email (the user-store lookup key).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// HS256 token codec bound to one signing key.
///
/// Shared by the credential issuer (sign) and the access gate (verify), so both always
/// use the same process key.
#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(key: &SigningKey, issuer: String, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = leeway_seconds;
        // jsonwebtoken only rejects once `exp < now - leeway`; this makes `now == exp` expired too
        validation.reject_tokens_expiring_in_less_than = 1;

        Self {
            issuer,
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Build claims for `subject` issued at `now` (expiry = now + ttl) and sign them.
    pub fn issue(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, AccessClaims), AppError> {
        let iat = now.timestamp();
        let claims = AccessClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat,
            exp: expiry(iat, self.ttl_seconds)?,
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    pub fn sign(&self, claims: &AccessClaims) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }

    /// Signature (HS256 only), `exp`, `iss` and required claims.
    /// Does NOT check that the subject still exists; that is the gate's job.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

fn expiry(iat: i64, ttl_seconds: u64) -> Result<i64, AppError> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(|ttl| iat.checked_add(ttl))
        .ok_or_else(|| {
            error!(ttl_seconds, "token expiry out of range");
            AppError::Internal
        })
}
