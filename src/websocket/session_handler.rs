use tracing::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use crate::board::sessions::Envelope;
use crate::board::Board;
use crate::models::{CursorsUpdateMessage, ObjectRefMessage, SendMessage, SessionId};

/// Register a new session and queue its snapshot.
///
/// Returns false if the session id is already taken.
pub fn handle_connect(session: &SessionId, outbox: Sender<String>, board: &mut Board) -> bool {
    if !board.sessions.register(session.clone(), outbox) {
        warn!("Session {} is already registered", session);
        return false;
    }
    let snapshot = SendMessage::Init(board.snapshot_for(session));
    board.sessions.deliver(vec![Envelope::only(session, snapshot)]);
    info!("Session {} connected ({} total)", session, board.sessions.len());
    true
}

/// Tear down a session: release its locks, drop its cursor and tell everyone left.
pub fn handle_disconnect(session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    let Some(gone) = board.sessions.unregister(session) else {
        // Already evicted, or never registered
        debug!("Disconnect for unknown session {}", session);
        return Vec::new();
    };

    let mut envelopes: Vec<Envelope> = board
        .locks
        .release_all_for(session)
        .into_iter()
        .map(|id| Envelope::all(SendMessage::ObjectUnlocked(ObjectRefMessage { id })))
        .collect();

    board.cursors.remove(session);
    envelopes.push(Envelope::all(SendMessage::CursorsUpdate(CursorsUpdateMessage {
        cursors: board.cursors.snapshot(),
    })));

    info!(
        "Session {} disconnected after {}s, released {} lock(s)",
        session,
        (chrono::Utc::now() - gone.connected_at).num_seconds(),
        envelopes.len() - 1
    );
    envelopes
}
