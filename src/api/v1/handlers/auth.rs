/*
 * Responsibility
 * - POST /login: hands the credentials to the CredentialIssuer
 * - GET / and GET /logout: session probes behind the access gate
 *
 * Logout is stateless. The token stays valid until it expires.
 */
use axum::{Json, extract::State};
use chrono::Utc;
use tracing::info;

use crate::{
    api::v1::{
        dto::{
            Empty, Envelope,
            auth::{LoginRequest, LoginResponse, SessionResponse},
        },
        extractors::{ApiJson, AuthCtxExtractor},
    },
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, AppError> {
    let issued = state
        .issuer
        .issue(&req.email, &req.password, Utc::now())
        .await?;

    Ok(Json(Envelope::with_message(
        "login successful",
        LoginResponse::from(issued),
    )))
}

pub async fn home(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Envelope<SessionResponse>> {
    Json(Envelope::with_message(
        "user authenticated",
        SessionResponse {
            email: ctx.email,
            expires_at: ctx.expires_at,
        },
    ))
}

pub async fn logout(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Envelope<Empty>> {
    info!(jti = %ctx.jti, "logout acknowledged");
    Json(Envelope::message("logged out"))
}
