//! Argon2id password hashing.
//!
//! Hashing is CPU heavy, so both operations hop onto the blocking pool.
//! `verify` always runs a full verification, against a dummy hash when the user is
//! unknown, so "no such user" and "wrong password" take the same time.
use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

#[derive(Clone, Debug)]
pub struct PasswordService {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswordService {
    pub fn new() -> Result<Self, PasswordError> {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Result<Self, PasswordError> {
        let dummy_hash = hash_with(&params, "agrodx-dummy-password")?;
        Ok(Self {
            params,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Cheapest valid parameters. Only for tests.
    #[cfg(test)]
    pub fn fast() -> Self {
        let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
        Self::with_params(params).expect("dummy hash")
    }

    pub async fn hash(&self, plain: String) -> Result<String, AppError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || hash_with(&params, &plain))
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                AppError::Internal
            })
    }

    /// `stored` is the user's PHC hash, or None when the user does not exist.
    pub async fn verify(&self, plain: String, stored: Option<String>) -> bool {
        let known_user = stored.is_some();
        let hash = stored.unwrap_or_else(|| self.dummy_hash.to_string());

        let matched = tokio::task::spawn_blocking(move || verify_with(&plain, &hash))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "password verification task failed");
                false
            });

        known_user && matched
    }
}

fn argon2(params: &Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
}

fn hash_with(params: &Params, plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2(params)
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

// Parameters come from the stored PHC string, not from `self.params`.
fn verify_with(plain: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "stored password hash is not a valid PHC string");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        error!(error = %e, "password service failure");
        AppError::Internal
    }
}
