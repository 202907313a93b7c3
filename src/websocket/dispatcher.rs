use tokio::sync::mpsc::Sender;
use tracing::warn;

use crate::board::sessions::Envelope;
use crate::board::Board;
use crate::models::{ReceivedMessage, SessionId};
use crate::websocket::error::ProtocolError;
use crate::websocket::msg_cursor_handler::handle_cursor_move_message;
use crate::websocket::msg_lock_handler::{handle_lock_message, handle_unlock_message};
use crate::websocket::msg_object_handler::{handle_add_object_message, handle_update_object_message};
use crate::websocket::msg_ping_handler::handle_ping_message;
use crate::websocket::session_handler::{handle_connect, handle_disconnect};

/// Parse one inbound text frame, enforcing the size limit first.
pub fn parse_message(text: &str, max_bytes: usize) -> Result<ReceivedMessage, ProtocolError> {
    if text.len() > max_bytes {
        return Err(ProtocolError::TooLarge { size: text.len(), limit: max_bytes });
    }
    Ok(serde_json::from_str(text)?)
}

pub fn on_connect(board: &mut Board, session: &SessionId, outbox: Sender<String>) -> bool {
    let registered = handle_connect(session, outbox, board);
    deliver(board, Vec::new());
    registered
}

/// Apply one client message and fan out the results before returning.
pub fn on_message(board: &mut Board, session: &SessionId, msg: ReceivedMessage) {
    if !board.sessions.contains(session) {
        warn!("Dropping {} from unregistered session {}", msg.name(), session);
        return;
    }

    let envelopes = route(board, session, msg);
    deliver(board, envelopes);
}

pub fn on_disconnect(board: &mut Board, session: &SessionId) {
    let envelopes = handle_disconnect(session, board);
    deliver(board, envelopes);
}

/// Fan out, then evict every session whose outbox filled up along the way.
///
/// Eviction is a regular disconnect: locks released, cursor dropped, the rest
/// told. Dropping the session's sender ends its writer task, which closes the
/// socket.
fn deliver(board: &mut Board, envelopes: Vec<Envelope>) {
    board.sessions.deliver(envelopes);
    while let Some(stalled) = board.sessions.take_overflowed() {
        warn!("Evicting session {}: not reading its messages", stalled);
        let envelopes = handle_disconnect(&stalled, board);
        board.sessions.deliver(envelopes);
    }
}

fn route(board: &mut Board, session: &SessionId, msg: ReceivedMessage) -> Vec<Envelope> {
    match msg {
        ReceivedMessage::AddObject(add_msg) => handle_add_object_message(add_msg, session, board),
        ReceivedMessage::UpdateObject(update_msg) => handle_update_object_message(update_msg, session, board),
        ReceivedMessage::LockObject(lock_msg) => handle_lock_message(lock_msg, session, board),
        ReceivedMessage::UnlockObject(unlock_msg) => handle_unlock_message(unlock_msg, session, board),
        ReceivedMessage::CursorMove(position) => handle_cursor_move_message(position, session, board),
        ReceivedMessage::Ping(ping_msg) => handle_ping_message(&ping_msg, session),
    }
}
