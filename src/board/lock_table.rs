use std::collections::BTreeMap;

use crate::board::object_store::ObjectStore;
use crate::models::{ObjectId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    Acquired,
    /// Held already, possibly by the requester itself.
    AlreadyLocked { holder: SessionId },
    UnknownObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    NotHolder,
}

/// Exclusive per-object edit locks. At most one holder per object.
#[derive(Debug, Default)]
pub struct LockTable {
    holders: BTreeMap<ObjectId, SessionId>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, objects: &ObjectStore, id: &ObjectId, session: &SessionId) -> AcquireOutcome {
        if !objects.contains(id) {
            return AcquireOutcome::UnknownObject;
        }
        if let Some(holder) = self.holders.get(id) {
            return AcquireOutcome::AlreadyLocked { holder: holder.clone() };
        }
        self.holders.insert(id.clone(), session.clone());
        AcquireOutcome::Acquired
    }

    pub fn release(&mut self, id: &ObjectId, session: &SessionId) -> ReleaseOutcome {
        match self.holders.get(id) {
            Some(holder) if holder == session => {
                self.holders.remove(id);
                ReleaseOutcome::Released
            }
            _ => ReleaseOutcome::NotHolder,
        }
    }

    /// Drop every lock held by `session`, returning the freed ids in id order.
    pub fn release_all_for(&mut self, session: &SessionId) -> Vec<ObjectId> {
        let mut released = Vec::new();
        self.holders.retain(|id, holder| {
            if holder == session {
                released.push(id.clone());
                false
            } else {
                true
            }
        });
        released
    }

    pub fn is_edit_allowed(&self, id: &ObjectId, session: &SessionId) -> bool {
        match self.holders.get(id) {
            Some(holder) => holder == session,
            None => true,
        }
    }

    #[cfg(test)]
    pub fn holder(&self, id: &ObjectId) -> Option<&SessionId> {
        self.holders.get(id)
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn snapshot(&self) -> BTreeMap<ObjectId, SessionId> {
        self.holders.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObjectPayload;
    use serde_json::json;

    fn store_with(n: usize) -> (ObjectStore, Vec<ObjectId>) {
        let mut store = ObjectStore::new();
        let ids = (0..n)
            .map(|_| store.create(ObjectPayload::from(json!({"type": "rect"}))).0)
            .collect();
        (store, ids)
    }

    #[test]
    fn test_lock_state_machine() {
        let (store, ids) = store_with(1);
        let id = &ids[0];
        let a = SessionId::from("a");
        let b = SessionId::from("b");
        let mut locks = LockTable::new();

        assert_eq!(locks.acquire(&store, id, &a), AcquireOutcome::Acquired);
        assert_eq!(locks.acquire(&store, id, &a), AcquireOutcome::AlreadyLocked { holder: a.clone() });
        assert_eq!(locks.acquire(&store, id, &b), AcquireOutcome::AlreadyLocked { holder: a.clone() });
        assert_eq!(locks.release(id, &b), ReleaseOutcome::NotHolder);
        assert_eq!(locks.holder(id), Some(&a));

        assert_eq!(locks.release(id, &a), ReleaseOutcome::Released);
        assert_eq!(locks.holder(id), None);
        assert_eq!(locks.release(id, &a), ReleaseOutcome::NotHolder);

        assert_eq!(locks.acquire(&store, id, &b), AcquireOutcome::Acquired);
        assert_eq!(locks.holder(id), Some(&b));
    }

    #[test]
    fn test_acquire_requires_existing_object() {
        let (store, _) = store_with(0);
        let mut locks = LockTable::new();
        let outcome = locks.acquire(&store, &ObjectId("ghost".to_string()), &SessionId::from("a"));
        assert_eq!(outcome, AcquireOutcome::UnknownObject);
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn test_edit_gate() {
        let (store, ids) = store_with(2);
        let a = SessionId::from("a");
        let b = SessionId::from("b");
        let mut locks = LockTable::new();
        locks.acquire(&store, &ids[0], &a);

        assert!(locks.is_edit_allowed(&ids[0], &a));
        assert!(!locks.is_edit_allowed(&ids[0], &b));
        assert!(locks.is_edit_allowed(&ids[1], &a));
        assert!(locks.is_edit_allowed(&ids[1], &b));
    }

    #[test]
    fn test_release_all_for_only_touches_holder() {
        let (store, ids) = store_with(4);
        let a = SessionId::from("a");
        let b = SessionId::from("b");
        let mut locks = LockTable::new();
        locks.acquire(&store, &ids[0], &a);
        locks.acquire(&store, &ids[1], &b);
        locks.acquire(&store, &ids[2], &a);

        let released = locks.release_all_for(&a);
        assert_eq!(released, vec![ids[0].clone(), ids[2].clone()]);
        assert!(locks.snapshot().values().all(|holder| holder != &a));
        assert_eq!(locks.holder(&ids[1]), Some(&b));

        assert!(locks.release_all_for(&a).is_empty());
    }
}
