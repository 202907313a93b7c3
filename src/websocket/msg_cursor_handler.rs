use crate::board::sessions::Envelope;
use crate::board::Board;
use crate::models::{CursorPosition, CursorsUpdateMessage, SendMessage, SessionId};

/// Handle a cursor movement.
///
/// The whole cursor map goes to every session but the mover.
pub fn handle_cursor_move_message(position: CursorPosition, session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    board.cursors.move_to(session, position);
    let update = SendMessage::CursorsUpdate(CursorsUpdateMessage { cursors: board.cursors.snapshot() });
    vec![Envelope::except(session, update)]
}
