use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, error, warn};
use futures_util::{StreamExt, SinkExt};

use crate::models::SessionId;
use crate::state::AppState;
use crate::websocket::dispatcher::{on_connect, on_disconnect, on_message, parse_message};


/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    // Hard cap on what the transport will buffer; frames between
    // max_message_bytes and this cap are read, then dropped by the dispatcher
    let transport_limit = app_state.config.transport_limit();
    ws.max_message_size(transport_limit)
        .max_frame_size(transport_limit)
        .on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {

    // Every connection is its own session
    let session_id = SessionId::new();
    let max_bytes = app_state.config.max_message_bytes;

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Everything addressed to this session goes through its outbox, in board order.
    // A reader that falls this far behind is evicted.
    let (outbox, mut inbox) = mpsc::channel::<String>(app_state.config.outbox_capacity.max(1));

    // Register and queue the snapshot under the board lock
    {
        let mut board = app_state.board.lock().await;
        if !on_connect(&mut board, &session_id, outbox) {
            error!("Could not register session {}", session_id);
            return;
        }
    }

    // Drain the outbox to the websocket
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = inbox.recv().await {
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Read client messages and apply them one at a time
    let recv_state = app_state.clone();
    let recv_session = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            let text = match frame {
                Message::Text(text) => text,
                Message::Close(_) => break,
                // Binary and control frames carry no protocol messages
                _ => continue,
            };

            let msg = match parse_message(&text, max_bytes) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("Dropping message from session {}: {}", recv_session, e);
                    continue;
                }
            };

            let mut board = recv_state.board.lock().await;
            on_message(&mut board, &recv_session, msg);
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let mut board = app_state.board.lock().await;
    on_disconnect(&mut board, &session_id);
    info!("WebSocket connection terminated for session {}", session_id);
}
