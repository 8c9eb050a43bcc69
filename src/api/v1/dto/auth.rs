/*
 * Responsibility
 * - POST /login request/response
 * - normalization of the credentials is the issuer's job, not this module's
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::IssuedToken;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub expires_at: i64,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.access_token,
            token_type: issued.token_type,
            expires_in: issued.expires_in,
            expires_at: issued.expires_at,
            first_name: issued.user.first_name,
            paternal_surname: issued.user.paternal_surname,
            maternal_surname: issued.user.maternal_surname,
        }
    }
}

/// Payload of the `GET /` probe.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub expires_at: i64,
}
