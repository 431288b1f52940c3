//! WebSocket endpoint

use super::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

pub(super) async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Pump queued snapshots to the client until either side goes away
///
/// Inbound frames are read only to notice the disconnect; their content is
/// ignored.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (id, mut outbound) = state.dashboard.open_connection().await;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            payload = outbound.recv() => match payload {
                Some(payload) => {
                    if let Err(e) = sender.send(Message::Text(payload.to_string())).await {
                        tracing::debug!(connection_id = %id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                // Pruned by the registry
                None => break,
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %id, error = %e, "WebSocket receive failed");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    state.dashboard.close_connection(id).await;
}
