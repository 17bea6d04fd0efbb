//! REST API handlers
//!
//! Every handler answers 200 with a value; failures show up in the content
//! (empty lists, `success: false`, zero rates).

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::state::AppState;

/// Scan for nearby wireless networks
pub async fn scan_networks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.scan().await;
    debug!(count = snapshot.networks.len(), in_progress = snapshot.in_progress, "Scan requested");
    Json(snapshot)
}

/// The currently associated network, or `null`
pub async fn connected_network(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.connected_network().await)
}

/// Ping a host
pub async fn ping_host(
    State(state): State<Arc<AppState>>,
    Path(host): Path<String>,
) -> impl IntoResponse {
    Json(state.probe.probe_latency(&host).await)
}

/// Run a throughput test
pub async fn speed_test(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Starting throughput test");
    Json(state.probe.measure_throughput().await)
}

/// Devices in the local neighbor table
pub async fn local_devices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.probe.discover_neighbors().await)
}

pub async fn system_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.system_info().await)
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.clone())
}
