/*
 * Responsibility
 * - middleware public interface
 * - auth::access (bearer gate), cors, http (request id / trace / limits)
 */
pub mod auth;
pub mod cors;
pub mod http;
