/*
 * Responsibility
 * - App-wide AppError (the full error taxonomy seen by clients)
 * - IntoResponse: HTTP status + uniform `{ success: false, message }` body
 * - Conversions from repo / public id errors
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::id_codec::IdCodecError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing fields in request")]
    MissingFields,
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid email or password")]
    AuthenticationFailed,
    #[error("token not supplied")]
    TokenMissing,
    // Expired, forged and orphaned tokens all end up here with the same message.
    #[error("invalid or expired token")]
    TokenInvalid,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields | AppError::InvalidInput(_) | AppError::AlreadyExists(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthenticationFailed | AppError::TokenMissing | AppError::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(what) => AppError::AlreadyExists(what),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (path or body reference)
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::invalid_input("invalid id")
            }
            // Codec misconfiguration or an id the server itself produced badly
            other => {
                tracing::error!(error = %other, "public id codec failure");
                AppError::Internal
            }
        }
    }
}
