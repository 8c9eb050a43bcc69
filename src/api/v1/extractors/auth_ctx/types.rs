/*
 * Responsibility
 * - The authenticated context as handlers see it
 * - The access middleware validates the token, stores this in request extensions,
 *   and handlers only ever receive this type
 *
 * Notes
 * - Token verification and the user-existence check belong to services::auth::AccessGate
 */

/// Context attached to a request that passed the access gate.
///
/// - `email` is the token subject, already re-resolved against the user store
/// - `jti` is only for log correlation (there is no denylist)
/// - `expires_at` is the token's `exp` (unix seconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub email: String,
    pub jti: String,
    pub expires_at: i64,
}

impl AuthCtx {
    pub fn new(email: String, jti: String, expires_at: i64) -> Self {
        Self {
            email,
            jti,
            expires_at,
        }
    }
}
