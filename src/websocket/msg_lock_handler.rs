use tracing::{debug, info};

use crate::board::lock_table::{AcquireOutcome, ReleaseOutcome};
use crate::board::sessions::Envelope;
use crate::board::Board;
use crate::models::{
    LockRejectedMessage, ObjectLockedMessage, ObjectRefMessage, RejectReason, SendMessage, SessionId,
};

/// Handle a lockObject request
pub fn handle_lock_message(lock_msg: ObjectRefMessage, session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    match board.locks.acquire(&board.objects, &lock_msg.id, session) {
        AcquireOutcome::Acquired => {
            info!("Object {} locked by {}", lock_msg.id, session);
            let locked = SendMessage::ObjectLocked(ObjectLockedMessage {
                id: lock_msg.id,
                by: session.clone(),
            });
            vec![Envelope::all(locked)]
        }
        // Re-acquiring your own lock changes nothing
        AcquireOutcome::AlreadyLocked { holder } if &holder == session => Vec::new(),
        AcquireOutcome::AlreadyLocked { holder } => {
            debug!("Lock on {} refused to {}: held by {}", lock_msg.id, session, holder);
            let rejected = SendMessage::LockRejected(LockRejectedMessage {
                id: lock_msg.id,
                reason: RejectReason::Locked,
                by: holder,
            });
            vec![Envelope::only(session, rejected)]
        }
        AcquireOutcome::UnknownObject => {
            debug!("Ignoring lock from {} for unknown object {}", session, lock_msg.id);
            Vec::new()
        }
    }
}

/// Handle an unlockObject request
pub fn handle_unlock_message(unlock_msg: ObjectRefMessage, session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    match board.locks.release(&unlock_msg.id, session) {
        ReleaseOutcome::Released => {
            info!("Object {} unlocked by {}", unlock_msg.id, session);
            vec![Envelope::all(SendMessage::ObjectUnlocked(unlock_msg))]
        }
        ReleaseOutcome::NotHolder => Vec::new(),
    }
}
