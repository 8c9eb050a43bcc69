use std::sync::Arc;

use axum::http::{HeaderMap, header};
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;
use tracing::error;

use crate::repos::user_repo::UserStore;
use crate::services::auth::jwt::TokenCodec;

/// Why a presented token was refused.
///
/// Only for logs: callers of the API always get the same `TokenInvalid` answer.
#[derive(Debug, Error)]
pub enum InvalidToken {
    #[error("token expired")]
    Expired,
    #[error("bad signature or algorithm")]
    BadSignature,
    #[error("subject no longer exists")]
    SubjectGone,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("user lookup failed")]
    Lookup,
}

impl From<jsonwebtoken::errors::Error> for InvalidToken {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => InvalidToken::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => InvalidToken::BadSignature,
            _ => InvalidToken::Malformed(e.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum GateRejection {
    // NoToken: header absent or not exactly `Bearer <token>`
    #[error("no bearer token")]
    TokenMissing,
    #[error(transparent)]
    Invalid(#[from] InvalidToken),
}

/// Subject admitted by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub email: String,
    pub jti: String,
    pub expires_at: i64,
}

/// Validates the bearer token of a protected request.
///
/// Chain: header shape -> signature/alg/exp/iss -> subject still exists.
/// Stateless apart from the key inside the codec; safe to share across requests.
#[derive(Clone)]
pub struct AccessGate {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl AccessGate {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    pub async fn check(&self, headers: &HeaderMap) -> Result<Admitted, GateRejection> {
        let token = bearer_token(headers).ok_or(GateRejection::TokenMissing)?;

        let claims = self.codec.verify(token).map_err(InvalidToken::from)?;

        let exists = self.users.exists(&claims.sub).await.map_err(|e| {
            error!(error = %e, "user lookup failed during token validation");
            InvalidToken::Lookup
        })?;
        if !exists {
            return Err(InvalidToken::SubjectGone.into());
        }

        Ok(Admitted {
            email: claims.sub,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }
}

/// `Authorization` must be exactly two whitespace-separated parts, the first literally `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    use crate::repos::memory::MemoryUserStore;
    use crate::repos::user_repo::NewUser;
    use crate::services::auth::signing_key::SigningKey;

    fn codec(seed: u8) -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(
            &SigningKey::from_bytes([seed; 32]),
            "agrodx-api".to_string(),
            3600,
            0,
        ))
    }

    async fn store_with(email: &str) -> Arc<MemoryUserStore> {
        let users = Arc::new(MemoryUserStore::new());
        users
            .create(
                NewUser {
                    email: email.to_string(),
                    password_hash: "$argon2id$stub".to_string(),
                    first_name: "Ana".to_string(),
                    paternal_surname: "Lopez".to_string(),
                    maternal_surname: "Ruiz".to_string(),
                    address: "Calle 1".to_string(),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        users
    }

    fn auth_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_accepts_only_two_part_bearer_values() {
        assert_eq!(bearer_token(&auth_headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&auth_headers("Bearer   abc  ")), Some("abc"));

        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&auth_headers("")), None);
        assert_eq!(bearer_token(&auth_headers("Bearer")), None);
        assert_eq!(bearer_token(&auth_headers("bearer abc")), None);
        assert_eq!(bearer_token(&auth_headers("Basic abc")), None);
        assert_eq!(bearer_token(&auth_headers("Bearer abc def")), None);
        assert_eq!(bearer_token(&auth_headers("abc")), None);
    }

    #[test]
    fn non_utf8_header_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn valid_token_for_existing_user_is_admitted() {
        let codec = codec(1);
        let gate = AccessGate::new(codec.clone(), store_with("ana@example.com").await);
        let (token, claims) = codec.issue("ana@example.com", Utc::now()).unwrap();

        let admitted = gate
            .check(&auth_headers(&format!("Bearer {token}")))
            .await
            .unwrap();

        assert_eq!(admitted.email, "ana@example.com");
        assert_eq!(admitted.jti, claims.jti);
        assert_eq!(admitted.expires_at, claims.exp);
    }

    #[tokio::test]
    async fn malformed_headers_never_reach_verification() {
        let gate = AccessGate::new(codec(1), store_with("ana@example.com").await);

        for value in ["Token abc", "Bearer a b", "Bearer", ""] {
            let err = gate.check(&auth_headers(value)).await.unwrap_err();
            assert!(matches!(err, GateRejection::TokenMissing), "{value:?}");
        }
        let err = gate.check(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, GateRejection::TokenMissing));
    }

    #[tokio::test]
    async fn token_signed_before_restart_is_rejected() {
        let users = store_with("ana@example.com").await;
        let (token, _) = codec(1).issue("ana@example.com", Utc::now()).unwrap();

        // new process, new key
        let gate = AccessGate::new(codec(2), users);
        let err = gate
            .check(&auth_headers(&format!("Bearer {token}")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GateRejection::Invalid(InvalidToken::BadSignature)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let codec = codec(1);
        let gate = AccessGate::new(codec.clone(), store_with("ana@example.com").await);
        let (token, _) = codec
            .issue("ana@example.com", Utc::now() - Duration::minutes(61))
            .unwrap();

        let err = gate
            .check(&auth_headers(&format!("Bearer {token}")))
            .await
            .unwrap_err();

        assert!(matches!(err, GateRejection::Invalid(InvalidToken::Expired)));
    }

    #[tokio::test]
    async fn token_reaching_exp_is_rejected() {
        let codec = codec(1);
        let gate = AccessGate::new(codec.clone(), store_with("ana@example.com").await);
        // exp == now
        let (token, _) = codec
            .issue("ana@example.com", Utc::now() - Duration::seconds(3600))
            .unwrap();

        let err = gate
            .check(&auth_headers(&format!("Bearer {token}")))
            .await
            .unwrap_err();

        assert!(matches!(err, GateRejection::Invalid(InvalidToken::Expired)));
    }

    #[tokio::test]
    async fn deleting_the_user_invalidates_the_next_check() {
        let codec = codec(1);
        let users = store_with("ana@example.com").await;
        let gate = AccessGate::new(codec.clone(), users.clone());
        let (token, _) = codec.issue("ana@example.com", Utc::now()).unwrap();
        let headers = auth_headers(&format!("Bearer {token}"));

        assert!(gate.check(&headers).await.is_ok());
        assert!(users.delete_by_email("ana@example.com").await.unwrap());

        let err = gate.check(&headers).await.unwrap_err();
        assert!(matches!(
            err,
            GateRejection::Invalid(InvalidToken::SubjectGone)
        ));
    }

    #[tokio::test]
    async fn tampered_claims_fail_signature_check() {
        let codec = codec(1);
        let gate = AccessGate::new(codec.clone(), store_with("ana@example.com").await);
        let (token, _) = codec.issue("ana@example.com", Utc::now()).unwrap();

        // swap the payload for one claiming another subject, keep the old signature
        let (other, _) = codec.issue("eve@example.com", Utc::now()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        let err = gate
            .check(&auth_headers(&format!("Bearer {forged}")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateRejection::Invalid(InvalidToken::BadSignature)
        ));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let gate = AccessGate::new(codec(1), store_with("ana@example.com").await);

        let err = gate
            .check(&auth_headers("Bearer not.a.jwt"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GateRejection::Invalid(InvalidToken::Malformed(_))
        ));
    }
}
