//! WebSocket transport for the log relay.
//!
//! Serves the `/ws` endpoint UI clients connect to. Each connection is
//! registered with the [`ClientRegistry`], which the relay broadcasts
//! through; inbound frames carry the per-client clear and catchup commands.
pub mod registry;
mod websocket;

pub use registry::ClientRegistry;

use crate::relay::LogBuffer;
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use websocket::WebSocketState;

pub async fn start_server(
    relay: Arc<LogBuffer>,
    registry: Arc<ClientRegistry>,
    port: u16,
) -> Result<()> {
    let state = Arc::new(WebSocketState { relay, registry });

    let app = Router::new()
        .route("/ws", get(websocket::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Log relay listening on ws://{}/ws", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
