use tracing::debug;
use chrono::Utc;

use crate::board::sessions::Envelope;
use crate::models::{PingMessage, PongMessage, SendMessage, SessionId};

/// Handle PingMessage
pub fn handle_ping_message(_ping_msg: &PingMessage, session: &SessionId) -> Vec<Envelope> {
    // Reply with pong, to the sender only
    debug!("Ping message received from session {}", session);
    let pong = SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    vec![Envelope::only(session, pong)]
}
