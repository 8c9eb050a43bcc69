/*
 * Responsibility
 * - request extractors shared by v1 handlers
 *   - AuthCtx: authenticated caller (set by middleware::auth::access)
 *   - PublicId<T>: sqids public id in the path -> internal i64
 *   - ApiJson<T>: JSON body whose rejection is a MissingFields envelope
 */
mod api_json;
mod auth_ctx;
pub mod public_id;

pub use api_json::ApiJson;
pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
