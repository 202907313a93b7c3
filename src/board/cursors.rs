use std::collections::BTreeMap;

use crate::models::{CursorPosition, SessionId};

/// Last known pointer position per session. Never merged with object state.
#[derive(Debug, Default)]
pub struct CursorMap {
    positions: BTreeMap<SessionId, CursorPosition>,
}

impl CursorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, session: &SessionId, position: CursorPosition) {
        self.positions.insert(session.clone(), position);
    }

    /// Returns true if the session had an entry.
    pub fn remove(&mut self, session: &SessionId) -> bool {
        self.positions.remove(session).is_some()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn snapshot(&self) -> BTreeMap<SessionId, CursorPosition> {
        self.positions.clone()
    }
}
