use tracing::{debug, info};

use crate::board::object_store::UpdateOutcome;
use crate::board::sessions::Envelope;
use crate::board::Board;
use crate::models::{
    AddObjectMessage, ObjectAddedMessage, RejectReason, SendMessage, SessionId, UpdateObjectMessage,
    UpdateRejectedMessage,
};

/// Handle AddObjectMessage
pub fn handle_add_object_message(add_msg: AddObjectMessage, session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    let kind = add_msg.obj.kind();
    let (id, obj) = board.objects.create(add_msg.obj);
    info!("Object {} ({}) created by {}", id, kind, session);

    // Everyone, sender included, learns the server-assigned id
    let added = SendMessage::AddObject(ObjectAddedMessage { id, obj: obj.clone() });
    vec![Envelope::all(added)]
}

/// Handle UpdateObjectMessage - Check, Apply and Broadcast
pub fn handle_update_object_message(update_msg: UpdateObjectMessage, session: &SessionId, board: &mut Board) -> Vec<Envelope> {
    if !board.objects.contains(&update_msg.id) {
        debug!("Ignoring update from {} for unknown object {}", session, update_msg.id);
        return Vec::new();
    }

    // Someone else holds the lock: reject to the requester only
    if !board.locks.is_edit_allowed(&update_msg.id, session) {
        debug!("Rejecting update from {} for locked object {}", session, update_msg.id);
        let rejected = SendMessage::UpdateRejected(UpdateRejectedMessage {
            id: update_msg.id,
            reason: RejectReason::Locked,
        });
        return vec![Envelope::only(session, rejected)];
    }

    match board.objects.update(&update_msg.id, &update_msg.updates) {
        UpdateOutcome::Applied => vec![Envelope::all(SendMessage::UpdateObject(update_msg))],
        UpdateOutcome::NoOp => Vec::new(),
    }
}
