use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use crate::models::{OutboundFrame, SendMessage, SessionId};

/// Fan-out scope of one outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    All,
    Except(SessionId),
    Only(SessionId),
}

/// An outbound message together with who should receive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub scope: Scope,
    pub message: SendMessage,
}

impl Envelope {
    pub fn all(message: SendMessage) -> Self {
        Self { scope: Scope::All, message }
    }

    pub fn except(session: &SessionId, message: SendMessage) -> Self {
        Self { scope: Scope::Except(session.clone()), message }
    }

    pub fn only(session: &SessionId, message: SendMessage) -> Self {
        Self { scope: Scope::Only(session.clone()), message }
    }
}

/// One live connection: its bounded outbound queue and sequence counter.
#[derive(Debug)]
pub struct Session {
    pub outbox: Sender<String>,
    pub connected_at: DateTime<Utc>,
    last_seq: u64,
    overflowed: bool,
}

impl Session {
    pub fn new(outbox: Sender<String>) -> Self {
        Self {
            outbox,
            connected_at: Utc::now(),
            last_seq: 0,
            overflowed: false,
        }
    }

    /// Stamp `message` with the next sequence number and queue it.
    ///
    /// Returns false the first time the queue is found full; nothing more is
    /// queued for this session after that.
    fn send(&mut self, id: &SessionId, message: &SendMessage) -> bool {
        if self.overflowed {
            return true;
        }
        self.last_seq += 1;
        let frame = OutboundFrame { seq: self.last_seq, message: message.clone() };
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to serialize message for session {}: {}", id, e);
                return true;
            }
        };
        match self.outbox.try_send(text) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbox full for session {} at seq {}", id, self.last_seq);
                self.overflowed = true;
                false
            }
            // The connection is going away; its own disconnect cleanup will follow.
            Err(TrySendError::Closed(_)) => {
                debug!("Outbox closed for session {}", id);
                true
            }
        }
    }
}

/// Connected sessions and the broadcast primitives over them.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<SessionId, Session>,
    overflowed: Vec<SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id is already registered.
    pub fn register(&mut self, id: SessionId, outbox: Sender<String>) -> bool {
        if self.sessions.contains_key(&id) {
            return false;
        }
        self.sessions.insert(id, Session::new(outbox));
        true
    }

    pub fn unregister(&mut self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Next session whose outbox filled up, still registered, awaiting eviction.
    pub fn take_overflowed(&mut self) -> Option<SessionId> {
        self.overflowed.pop()
    }

    pub fn broadcast_all(&mut self, message: &SendMessage) {
        for (id, session) in self.sessions.iter_mut() {
            if !session.send(id, message) {
                self.overflowed.push(id.clone());
            }
        }
        debug!("Broadcast to all {} sessions", self.sessions.len());
    }

    pub fn broadcast_except(&mut self, sender: &SessionId, message: &SendMessage) {
        for (id, session) in self.sessions.iter_mut().filter(|(id, _)| *id != sender) {
            if !session.send(id, message) {
                self.overflowed.push(id.clone());
            }
        }
        debug!("Broadcast to {} sessions except {}", self.sessions.len().saturating_sub(1), sender);
    }

    pub fn send_to(&mut self, target: &SessionId, message: &SendMessage) {
        match self.sessions.get_mut(target) {
            Some(session) => {
                if !session.send(target, message) {
                    self.overflowed.push(target.clone());
                }
            }
            None => warn!("Dropping message for unknown session {}", target),
        }
    }

    pub fn deliver(&mut self, envelopes: Vec<Envelope>) {
        for envelope in envelopes {
            match &envelope.scope {
                Scope::All => self.broadcast_all(&envelope.message),
                Scope::Except(sender) => self.broadcast_except(sender, &envelope.message),
                Scope::Only(target) => self.send_to(target, &envelope.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObjectId, ObjectRefMessage};
    use serde_json::Value;
    use tokio::sync::mpsc::{self, Receiver};

    fn unlocked(id: &str) -> SendMessage {
        SendMessage::ObjectUnlocked(ObjectRefMessage { id: ObjectId(id.to_string()) })
    }

    fn drain(rx: &mut Receiver<String>) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(text) = rx.try_recv() {
            out.push(serde_json::from_str(&text).unwrap());
        }
        out
    }

    #[test]
    fn test_scopes_and_sequence_numbers() {
        let mut registry = SessionRegistry::new();
        let a = SessionId::from("a");
        let b = SessionId::from("b");
        let (tx_a, mut rx_a) = mpsc::channel(16);
        let (tx_b, mut rx_b) = mpsc::channel(16);
        assert!(registry.register(a.clone(), tx_a));
        assert!(registry.register(b.clone(), tx_b));

        registry.deliver(vec![
            Envelope::all(unlocked("obj-1")),
            Envelope::except(&a, unlocked("obj-2")),
            Envelope::only(&a, unlocked("obj-3")),
        ]);

        let got_a = drain(&mut rx_a);
        let got_b = drain(&mut rx_b);
        let ids = |v: &[Value]| v.iter().map(|m| m["id"].as_str().unwrap().to_string()).collect::<Vec<_>>();
        let seqs = |v: &[Value]| v.iter().map(|m| m["seq"].as_u64().unwrap()).collect::<Vec<_>>();

        assert_eq!(ids(&got_a), vec!["obj-1", "obj-3"]);
        assert_eq!(seqs(&got_a), vec![1, 2]);
        assert_eq!(ids(&got_b), vec!["obj-1", "obj-2"]);
        assert_eq!(seqs(&got_b), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(16);
        assert!(registry.register(SessionId::from("a"), tx.clone()));
        assert!(!registry.register(SessionId::from("a"), tx));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_closed_outbox_does_not_break_fanout() {
        let mut registry = SessionRegistry::new();
        let (tx_a, rx_a) = mpsc::channel(16);
        let (tx_b, mut rx_b) = mpsc::channel(16);
        registry.register(SessionId::from("a"), tx_a);
        registry.register(SessionId::from("b"), tx_b);
        drop(rx_a);

        registry.broadcast_all(&unlocked("obj-1"));
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[test]
    fn test_full_outbox_is_reported_once() {
        let mut registry = SessionRegistry::new();
        let stalled = SessionId::from("stalled");
        let (tx_stalled, _rx_stalled) = mpsc::channel(2);
        let (tx_b, mut rx_b) = mpsc::channel(64);
        registry.register(stalled.clone(), tx_stalled);
        registry.register(SessionId::from("b"), tx_b);

        for i in 0..10 {
            registry.broadcast_all(&unlocked(&format!("obj-{}", i)));
        }

        assert_eq!(registry.take_overflowed(), Some(stalled));
        assert_eq!(registry.take_overflowed(), None);
        let seqs: Vec<u64> = drain(&mut rx_b).iter().map(|m| m["seq"].as_u64().unwrap()).collect();
        assert_eq!(seqs, (1..=10).collect::<Vec<u64>>());
    }
}
