/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the authenticated caller (AuthCtx) to handlers
 * - axum specifics live in core, the type itself in types
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
