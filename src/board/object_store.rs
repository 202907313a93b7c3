use std::collections::BTreeMap;

use crate::models::{ObjectId, ObjectPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The id is unknown; nothing changed.
    NoOp,
}

/// Canonical map of object id to payload.
///
/// The store knows nothing about locks; gating edits is the dispatcher's job.
/// Objects are never removed.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, ObjectPayload>,
    last_id: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload` under a freshly allocated id.
    ///
    /// Ids come from a strictly monotonic counter and are never reissued.
    pub fn create(&mut self, payload: ObjectPayload) -> (ObjectId, &ObjectPayload) {
        self.last_id += 1;
        let id = ObjectId::from_counter(self.last_id);
        let stored: &ObjectPayload = self.objects.entry(id.clone()).or_insert(payload);
        (id, stored)
    }

    pub fn update(&mut self, id: &ObjectId, updates: &ObjectPayload) -> UpdateOutcome {
        match self.objects.get_mut(id) {
            Some(payload) => {
                payload.merge(updates);
                UpdateOutcome::Applied
            }
            None => UpdateOutcome::NoOp,
        }
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Full copy of the store, for a joining session.
    pub fn snapshot(&self) -> BTreeMap<ObjectId, ObjectPayload> {
        self.objects.clone()
    }

    #[cfg(test)]
    pub fn get(&self, id: &ObjectId) -> Option<&ObjectPayload> {
        self.objects.get(id)
    }
}
