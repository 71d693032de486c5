use super::registry::ClientRegistry;
use crate::relay::{ClientCommand, LogBuffer};
use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tracing::{debug, error};

pub struct WebSocketState {
    pub relay: Arc<LogBuffer>,
    pub registry: Arc<ClientRegistry>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WebSocketState>>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<WebSocketState>) {
    let (mut sender, mut receiver) = socket.split();

    let (client_id, mut outbound_rx) = state.registry.register();
    debug!(
        "client {} connected ({} active)",
        client_id,
        state.registry.len()
    );

    // Drain the client's outbound queue into the socket.
    let send_task = tokio::spawn(async move {
        while let Some(json) = outbound_rx.recv().await {
            if sender
                .send(axum::extract::ws::Message::Text(json))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Per-client inbound events: log_clear and log_catchup.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(axum::extract::ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => state.relay.handle_command(client_id, command),
                    Err(e) => debug!("ignoring frame from client {}: {}", client_id, e),
                }
            }
            Ok(axum::extract::ws::Message::Close(_)) => {
                debug!("client {} disconnected", client_id);
                break;
            }
            Err(e) => {
                error!("websocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    state.registry.unregister(client_id);
    debug!(
        "client {} unregistered ({} active)",
        client_id,
        state.registry.len()
    );
    send_task.abort();
}
