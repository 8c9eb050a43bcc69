use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::error::AppError;
use crate::repos::user_repo::{UserRow, UserStore};
use crate::services::auth::{jwt::TokenCodec, password::PasswordService};
use crate::services::sanitizer;

/// Result of a successful login. Handlers map it into the HTTP DTO.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub expires_at: i64,
    pub user: UserRow,
}

/// Verifies email + password against the user store and issues an access token.
///
/// Unknown email and wrong password are indistinguishable to the caller: both return
/// `AppError::AuthenticationFailed`, and both pay for one Argon2 verification.
#[derive(Clone)]
pub struct CredentialIssuer {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    codec: Arc<TokenCodec>,
}

impl CredentialIssuer {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: PasswordService,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            passwords,
            codec,
        }
    }

    /// Normalize the credentials, check them and sign a token issued at `now`.
    ///
    /// - `MissingFields` when either value is empty after sanitizing
    /// - `AuthenticationFailed` for unknown email or wrong password
    pub async fn issue(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let email = sanitizer::clean(email);
        let password = sanitizer::clean(password);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::MissingFields);
        }

        let user = self.users.find_by_email(&email).await.map_err(|e| {
            error!(error = %e, "user lookup failed during login");
            AppError::Internal
        })?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = self.passwords.verify(password, stored_hash).await;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                // which of the two checks failed stays out of the logs as well
                info!("login rejected");
                return Err(AppError::AuthenticationFailed);
            }
        };

        let (access_token, claims) = self.codec.issue(&user.email, now)?;
        info!(jti = %claims.jti, exp = claims.exp, "access token issued");

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.codec.ttl_seconds(),
            expires_at: claims.exp,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::MemoryUserStore;
    use crate::repos::user_repo::NewUser;
    use crate::services::auth::signing_key::SigningKey;

    async fn issuer_with_user(email: &str, password: &str) -> (CredentialIssuer, Arc<TokenCodec>) {
        let passwords = PasswordService::fast();
        let users = Arc::new(MemoryUserStore::new());
        users
            .create(
                NewUser {
                    email: email.to_string(),
                    password_hash: passwords.hash(password.to_string()).await.unwrap(),
                    first_name: "Ana".to_string(),
                    paternal_surname: "Lopez".to_string(),
                    maternal_surname: "Ruiz".to_string(),
                    address: "Calle 1".to_string(),
                },
                Utc::now(),
            )
            .await
            .unwrap();

        let codec = Arc::new(TokenCodec::new(
            &SigningKey::from_bytes([3; 32]),
            "agrodx-api".to_string(),
            3600,
            0,
        ));
        (
            CredentialIssuer::new(users, passwords, codec.clone()),
            codec,
        )
    }

    #[tokio::test]
    async fn matching_credentials_yield_token_for_that_subject() {
        let (issuer, codec) = issuer_with_user("ana@example.com", "s3cret").await;
        let now = Utc::now();

        let issued = issuer.issue("ana@example.com", "s3cret", now).await.unwrap();

        let claims = codec.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "ana@example.com");
        assert_eq!(claims.exp, now.timestamp() + 3600);
        assert_eq!(issued.expires_at, claims.exp);
        assert_eq!(issued.expires_in, 3600);
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.user.first_name, "Ana");
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_the_same_way() {
        let (issuer, _) = issuer_with_user("ana@example.com", "s3cret").await;

        let unknown = issuer
            .issue("nobody@example.com", "s3cret", Utc::now())
            .await
            .unwrap_err();
        let wrong = issuer
            .issue("ana@example.com", "guess", Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(unknown, AppError::AuthenticationFailed));
        assert!(matches!(wrong, AppError::AuthenticationFailed));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.status(), wrong.status());
    }

    #[tokio::test]
    async fn empty_after_sanitizing_is_missing_fields() {
        let (issuer, _) = issuer_with_user("ana@example.com", "s3cret").await;

        let err = issuer
            .issue("  ", "s3cret", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingFields));

        let err = issuer
            .issue("ana@example.com", "<script>x</script>", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingFields));
    }

    #[tokio::test]
    async fn email_is_sanitized_before_lookup() {
        let (issuer, _) = issuer_with_user("ana@example.com", "s3cret").await;

        let issued = issuer
            .issue(" ana@example.com ", "s3cret", Utc::now())
            .await
            .unwrap();
        assert_eq!(issued.user.email, "ana@example.com");
    }
}
