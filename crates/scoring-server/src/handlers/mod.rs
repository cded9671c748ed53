//! HTTP route handlers for the scoring services.

pub mod client;
pub mod pipeline;

/// Liveness endpoint.
pub async fn health() -> &'static str {
    "OK"
}
