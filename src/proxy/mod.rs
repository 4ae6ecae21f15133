//! Core relay handler.
//!
//! [`relay_handler`] is the Axum fallback that receives every request
//! except `GET /health`. Preflights are answered immediately; anything
//! else is parsed ([`request`]), given an API key by the configured
//! provider, sent upstream once ([`upstream`]), and answered with the
//! upstream JSON or an error body. All responses carry the CORS headers
//! from [`cors`].

pub mod cors;
pub mod request;
pub mod upstream;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;

use crate::error::RelayError;
use crate::server::AppState;

pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return cors::preflight();
    }

    let correlation_id = resolve_correlation_id(&req_headers);

    match relay(&state, &body, &correlation_id).await {
        Ok(upstream_body) => {
            state.stats.relayed.fetch_add(1, Ordering::Relaxed);
            cors::json_response(StatusCode::OK, upstream_body, &correlation_id)
        }
        Err(e) => {
            if e.is_client_error() {
                state.stats.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    correlation_id = %correlation_id,
                    method = %method,
                    error = %e,
                    "request rejected"
                );
            } else {
                state.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    correlation_id = %correlation_id,
                    method = %method,
                    error = %e,
                    "relay failed"
                );
            }
            cors::error_response(e.status(), &e.to_string(), &correlation_id)
        }
    }
}

/// Longest caller-supplied correlation ID that is echoed back.
pub const MAX_CORRELATION_ID_LEN: usize = 128;

/// The caller's `x-correlation-id`, or a fresh UUID when it is absent,
/// not visible ASCII, or longer than [`MAX_CORRELATION_ID_LEN`].
fn resolve_correlation_id(headers: &HeaderMap) -> String {
    headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_CORRELATION_ID_LEN)
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from)
}

async fn relay(state: &AppState, body: &[u8], correlation_id: &str) -> Result<Bytes, RelayError> {
    let query = request::parse_query(body)?;
    let api_key = state.api_key.resolve().await?;
    let response = state
        .upstream
        .fetch(&query, &api_key, correlation_id)
        .await?;
    Ok(response.body)
}
