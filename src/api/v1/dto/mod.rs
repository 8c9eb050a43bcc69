/*
 * Responsibility
 * - request/response DTOs for v1, one module per resource
 * - the shared response envelope `{ success, message?, ...payload }`
 * - request-side normalization helpers (sanitize + required check)
 */
use serde::Serialize;

use crate::error::AppError;
use crate::services::sanitizer;

pub mod auth;
pub mod categories;
pub mod diagnoses;
pub mod diseases;
pub mod images;
pub mod reviews;
pub mod treatments;
pub mod users;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(message: &'static str, payload: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            payload,
        }
    }
}

impl Envelope<Empty> {
    pub fn message(message: &'static str) -> Self {
        Self::with_message(message, Empty {})
    }
}

/// `{ "id": ... }` payload of a 201.
#[derive(Debug, Serialize)]
pub struct Created<I> {
    pub id: I,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

/// Sanitized value, or MissingFields when nothing is left of it.
pub fn required(value: &str) -> Result<String, AppError> {
    let cleaned = sanitizer::clean(value);
    if cleaned.is_empty() {
        return Err(AppError::MissingFields);
    }
    Ok(cleaned)
}
