//! WebSocket handling for pet subscribers.
//!
//! A connection gets the current state on open, then every `cat_response`
//! broadcast. Clients may chat over the socket too.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use whiskers_shared::{ClientMessage, ServerMessage};

use crate::app::App;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const EMPTY_MESSAGE: &str = "EMPTY_MESSAGE";
pub const UNKNOWN_EVENT: &str = "UNKNOWN_EVENT";

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = Uuid::new_v4();

    // Create a bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    // Registration queues the current state as the first frame.
    app.subscribe(connection_id, tx.clone()).await;

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        event = msg.event_name(),
                        "Failed to serialize message"
                    );
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let response = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => handle_message(msg, &app, connection_id),
                    Err(e) => {
                        tracing::warn!(
                            connection_id = %connection_id,
                            error = %e,
                            "Failed to parse message"
                        );
                        Some(ServerMessage::error(
                            PARSE_ERROR,
                            format!("Invalid message format: {}", e),
                        ))
                    }
                };
                if let Some(response) = response {
                    if tx.try_send(response).is_err() {
                        tracing::warn!(
                            connection_id = %connection_id,
                            "Failed to send response, channel full or closed"
                        );
                    }
                }
            }
            Ok(Message::Ping(_)) => {
                let _ = tx.try_send(ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    app.connections.unregister(connection_id).await;
    send_task.abort();

    let remaining = app.connections.count().await;
    tracing::info!(
        connection_id = %connection_id,
        remaining = remaining,
        "WebSocket connection terminated"
    );
}

/// Dispatch a parsed client message.
///
/// Returns the direct reply for the sender, if any. Chat turns run on their
/// own task so the socket keeps reading while the model thinks; their
/// result reaches the sender through the broadcast.
fn handle_message(
    msg: ClientMessage,
    app: &Arc<App>,
    connection_id: Uuid,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::ChatMessage(request) => {
            if request.text.trim().is_empty() {
                return Some(ServerMessage::error(EMPTY_MESSAGE, "text must not be empty"));
            }
            tracing::debug!(connection_id = %connection_id, "Chat message over websocket");
            let app = app.clone();
            tokio::spawn(async move {
                app.chat(&request.text).await;
            });
            None
        }

        ClientMessage::Unknown => {
            tracing::debug!(connection_id = %connection_id, "Ignoring unknown event");
            Some(ServerMessage::error(UNKNOWN_EVENT, "Unknown event"))
        }
    }
}
