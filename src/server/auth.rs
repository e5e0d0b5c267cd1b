//! Static API-key gate.
//!
//! Every route mounted before this middleware requires an `x-api-key`
//! header equal to the configured secret. The comparison goes through
//! SHA-256 digests so it is constant-time regardless of key length.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::server::response::ApiError;
use crate::server::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub fn key_matches(expected: &str, headers: &HeaderMap) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|provided| {
            let a = Sha256::digest(provided.as_bytes());
            let b = Sha256::digest(expected.as_bytes());
            a == b
        })
}

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if key_matches(&state.api_key, request.headers()) {
        next.run(request).await
    } else {
        warn!(path = %request.uri().path(), "rejected request with bad or missing api key");
        ApiError::Unauthorized.into_response()
    }
}
