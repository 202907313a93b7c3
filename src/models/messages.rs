use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CursorPosition, ObjectId, ObjectPayload, SessionId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddObjectMessage {
    #[serde(alias = "payload")]
    pub obj: ObjectPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectMessage {
    pub id: ObjectId,
    pub updates: ObjectPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRefMessage {
    pub id: ObjectId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PingMessage {}

/// Messages a client may send.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReceivedMessage {
    AddObject(AddObjectMessage),
    UpdateObject(UpdateObjectMessage),
    LockObject(ObjectRefMessage),
    UnlockObject(ObjectRefMessage),
    CursorMove(CursorPosition),
    Ping(PingMessage),
}

impl ReceivedMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ReceivedMessage::AddObject(_) => "addObject",
            ReceivedMessage::UpdateObject(_) => "updateObject",
            ReceivedMessage::LockObject(_) => "lockObject",
            ReceivedMessage::UnlockObject(_) => "unlockObject",
            ReceivedMessage::CursorMove(_) => "cursorMove",
            ReceivedMessage::Ping(_) => "ping",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    Locked,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitMessage {
    pub session_id: SessionId,
    pub objects: BTreeMap<ObjectId, ObjectPayload>,
    pub cursors: BTreeMap<SessionId, CursorPosition>,
    pub locks: BTreeMap<ObjectId, SessionId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAddedMessage {
    pub id: ObjectId,
    pub obj: ObjectPayload,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRejectedMessage {
    pub id: ObjectId,
    pub reason: RejectReason,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLockedMessage {
    pub id: ObjectId,
    pub by: SessionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockRejectedMessage {
    pub id: ObjectId,
    pub reason: RejectReason,
    pub by: SessionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CursorsUpdateMessage {
    pub cursors: BTreeMap<SessionId, CursorPosition>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Messages the server sends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SendMessage {
    Init(InitMessage),
    AddObject(ObjectAddedMessage),
    UpdateObject(UpdateObjectMessage),
    UpdateRejected(UpdateRejectedMessage),
    ObjectLocked(ObjectLockedMessage),
    ObjectUnlocked(ObjectRefMessage),
    LockRejected(LockRejectedMessage),
    CursorsUpdate(CursorsUpdateMessage),
    Pong(PongMessage),
}

/// A `SendMessage` stamped with the recipient's sequence number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundFrame {
    pub seq: u64,
    #[serde(flatten)]
    pub message: SendMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_client_messages() {
        let msg: ReceivedMessage = serde_json::from_value(json!({
            "type": "addObject",
            "obj": {"type": "note", "x": 1, "y": 2, "text": "hi"}
        }))
        .unwrap();
        assert_eq!(msg.name(), "addObject");

        let msg: ReceivedMessage = serde_json::from_value(json!({
            "type": "addObject",
            "payload": {"type": "rect"}
        }))
        .unwrap();
        assert!(matches!(msg, ReceivedMessage::AddObject(_)));

        let msg: ReceivedMessage = serde_json::from_value(json!({
            "type": "updateObject", "id": "obj-1", "updates": {"x": 5}
        }))
        .unwrap();
        assert_eq!(
            msg,
            ReceivedMessage::UpdateObject(UpdateObjectMessage {
                id: ObjectId("obj-1".to_string()),
                updates: ObjectPayload::from(json!({"x": 5})),
            })
        );

        let msg: ReceivedMessage = serde_json::from_value(json!({"type": "cursorMove", "x": 1.5, "y": -3})).unwrap();
        assert_eq!(msg, ReceivedMessage::CursorMove(CursorPosition { x: 1.5, y: -3.0 }));

        let msg: ReceivedMessage = serde_json::from_value(json!({"type": "ping"})).unwrap();
        assert_eq!(msg, ReceivedMessage::Ping(PingMessage {}));
    }

    #[test]
    fn test_reject_malformed_messages() {
        let malformed = [
            json!({"type": "updateObject", "id": "obj-1"}),
            json!({"type": "updateObject", "updates": {"x": 1}}),
            json!({"type": "updateObject", "id": "obj-1", "updates": 7}),
            json!({"type": "addObject"}),
            json!({"type": "addObject", "obj": "rect"}),
            json!({"type": "lockObject"}),
            json!({"type": "cursorMove", "x": 1}),
            json!({"type": "deleteObject", "id": "obj-1"}),
            json!({"id": "obj-1"}),
        ];
        for value in malformed {
            assert!(
                serde_json::from_value::<ReceivedMessage>(value.clone()).is_err(),
                "accepted {}",
                value
            );
        }
    }

    #[test]
    fn test_outbound_frame_shape() {
        let frame = OutboundFrame {
            seq: 4,
            message: SendMessage::UpdateRejected(UpdateRejectedMessage {
                id: ObjectId("obj-1".to_string()),
                reason: RejectReason::Locked,
            }),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"seq": 4, "type": "updateRejected", "id": "obj-1", "reason": "locked"})
        );

        let frame = OutboundFrame {
            seq: 1,
            message: SendMessage::ObjectLocked(ObjectLockedMessage {
                id: ObjectId("obj-2".to_string()),
                by: SessionId::from("a"),
            }),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"seq": 1, "type": "objectLocked", "id": "obj-2", "by": "a"})
        );
    }
}
