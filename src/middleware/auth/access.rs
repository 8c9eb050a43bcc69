//! Bearer access-token gate -> AuthCtx in request extensions
//!
//! - Runs the full AccessGate chain once per request, before the handler.
//! - Rejections are uniform for the client (`TokenMissing` / `TokenInvalid`);
//!   the precise reason only goes to the log.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::GateRejection;
use crate::state::AppState;

/// Put every route of `router` behind the gate.
///
/// `route_layer` so that unknown paths still answer 404 instead of 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let admitted = match state.gate.check(req.headers()).await {
        Ok(admitted) => admitted,
        Err(GateRejection::TokenMissing) => {
            debug!(path = %req.uri().path(), "request without bearer token");
            return Err(AppError::TokenMissing);
        }
        Err(GateRejection::Invalid(reason)) => {
            warn!(
                path = %req.uri().path(),
                reason = %reason,
                "access token rejected"
            );
            return Err(AppError::TokenInvalid);
        }
    };

    let auth_ctx = AuthCtx::new(admitted.email, admitted.jti, admitted.expires_at);

    // middleware -> extractor hand-off
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
