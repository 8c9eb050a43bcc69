/*
 * Responsibility
 * - v1 handlers, one module per resource
 * - shared helpers for resolving public-id references found in request bodies
 */
use crate::error::AppError;
use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod diagnoses;
pub mod diseases;
pub mod health;
pub mod images;
pub mod reviews;
pub mod treatments;
pub mod users;

/// Decode a public id taken from a request body. Malformed -> InvalidInput naming the field.
pub(crate) fn decode_ref(
    state: &AppState,
    field: &'static str,
    public_id: &str,
) -> Result<i64, AppError> {
    state
        .id_codec
        .decode(public_id)
        .map_err(|_| AppError::InvalidInput(format!("invalid {field}")))
}

/// A well-formed reference that points at nothing.
pub(crate) fn unknown_ref(field: &'static str) -> AppError {
    AppError::InvalidInput(format!("unknown {field}"))
}
