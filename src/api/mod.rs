//! Query API
//!
//! HTTP surface for reading channel history, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /lastmessages/:channel` - Retained history, oldest first
//! - `GET /lastmessages/:channel/:since` - Records stamped after `since`
//! - `GET /health` - Connection state and channel count
//!
//! Responses for `/lastmessages` are plain text: the stored records
//! themselves, concatenated. A channel the service never joined yields the
//! literal body `Channel does not exist` with status 200.

pub mod query;

pub use query::NOT_FOUND_BODY;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::client::ChatClient;
use crate::error::Result;
use crate::registry::ChannelRegistry;

/// Shared state for all handlers
pub struct AppState {
    /// Channel rings the queries read from
    pub registry: Arc<ChannelRegistry>,
    /// Upstream client, consulted for the health report
    pub client: Arc<ChatClient>,
}

impl AppState {
    pub fn new(registry: Arc<ChannelRegistry>, client: Arc<ChatClient>) -> Self {
        Self { registry, client }
    }
}

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/lastmessages/:channel", get(query::last_messages))
        .route("/lastmessages/:channel/:since", get(query::last_messages_since))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the query API server
///
/// Runs until `shutdown` resolves, then finishes in-flight requests.
pub async fn serve<F>(state: AppState, addr: &str, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Query API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Query API shut down gracefully");
    Ok(())
}

/// Wait for a shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    connected: bool,
    channels: usize,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        connected: state.client.is_connected(),
        channels: state.registry.channel_count().await,
    })
}
