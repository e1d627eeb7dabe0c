//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, route source metadata, loaded route / cached sender
//! counts, and cumulative send statistics.

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
    pub routing: RoutingHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct RoutingHealth {
    pub source: String,
    pub routes: usize,
    pub default_project: String,
    pub active_senders: usize,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub events_sent: u64,
    pub events_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        routing: RoutingHealth {
            source: state.route_source.clone(),
            routes: state.table.len(),
            default_project: state.table.default_route().name.clone(),
            active_senders: state.transport.sender_count(),
        },
        stats: StatsResponse {
            events_sent: state.stats.sent.load(Ordering::Relaxed),
            events_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
