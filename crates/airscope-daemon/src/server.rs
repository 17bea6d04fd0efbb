//! Web server setup and routing

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api;
use crate::state::AppState;

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/wifi/scan", get(api::scan_networks))
        .route("/api/wifi/connected", get(api::connected_network))
        .route("/api/network/ping/{host}", get(api::ping_host))
        .route("/api/network/speedtest", get(api::speed_test))
        .route("/api/network/local", get(api::local_devices))
        .route("/api/system/info", get(api::system_info))
        .route("/api/config", get(api::get_config))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP service until the process is stopped
pub async fn run(state: Arc<AppState>, bind: &str) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(address = %bind, protocol = "HTTP", "Starting web server");
    axum::serve(listener, app).await?;
    Ok(())
}
