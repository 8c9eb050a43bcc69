/*
 * Responsibility
 * - Users request/response DTOs
 * - validate(): required fields, sanitizing, email shape
 * - the password is handed on in plain form only as far as the hashing step
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::required;
use crate::error::AppError;
use crate::repos::user_repo::UserRow;
use crate::services::sanitizer;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: String,
    #[serde(default)]
    pub address: String,
}

/// CreateUserRequest after sanitizing. `password` is still plain text.
#[derive(Debug)]
pub struct ValidUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub address: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<ValidUser, AppError> {
        let user = ValidUser {
            email: required(&self.email)?,
            password: required(&self.password)?,
            first_name: required(&self.first_name)?,
            paternal_surname: required(&self.paternal_surname)?,
            maternal_surname: required(&self.maternal_surname)?,
            address: required(&self.address)?,
        };
        if !looks_like_email(&user.email) {
            return Err(AppError::invalid_input("email is not valid"));
        }
        Ok(user)
    }
}

// Shape only: one '@' with something on both sides and a dot in the domain.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

/// UpdateUserRequest after sanitizing; blank values count as absent.
#[derive(Debug, Default)]
pub struct ValidUserUpdate {
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<ValidUserUpdate, AppError> {
        let update = ValidUserUpdate {
            first_name: sanitizer::clean_opt(self.first_name.as_deref()),
            paternal_surname: sanitizer::clean_opt(self.paternal_surname.as_deref()),
            maternal_surname: sanitizer::clean_opt(self.maternal_surname.as_deref()),
            address: sanitizer::clean_opt(self.address.as_deref()),
            password: sanitizer::clean_opt(self.password.as_deref()),
        };

        let nothing_to_do = update.first_name.is_none()
            && update.paternal_surname.is_none()
            && update.maternal_surname.is_none()
            && update.address.is_none()
            && update.password.is_none();
        if nothing_to_do {
            return Err(AppError::MissingFields);
        }
        Ok(update)
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(rename = "type")]
    pub account_type: String,
    pub status: String,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub address: String,
    pub registered_at: DateTime<Utc>,
    pub account: AccountResponse,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            paternal_surname: row.paternal_surname,
            maternal_surname: row.maternal_surname,
            address: row.address,
            registered_at: row.registered_at,
            account: AccountResponse {
                account_type: row.account_type,
                status: row.account_status,
                modified_at: row.account_modified_at,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize)]
pub struct UserItem {
    pub user: UserResponse,
}
