//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, upstream target, key source, and cumulative request
//! statistics. The API key itself is never included.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub upstream: UpstreamHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct UpstreamHealth {
    pub url: String,
    pub key_source: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_relayed: u64,
    pub requests_rejected: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        upstream: UpstreamHealth {
            url: state.upstream.base_url().to_string(),
            key_source: state.api_key.name().to_string(),
        },
        stats: StatsResponse {
            requests_relayed: state.stats.relayed.load(Ordering::Relaxed),
            requests_rejected: state.stats.rejected.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
