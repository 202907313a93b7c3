//! Server-side board state: objects, locks, cursors and connected sessions.
//!
//! One `Board` is the single source of truth for a whiteboard. It is owned by
//! the application state behind one mutex; every connect, message and
//! disconnect is handled to completion while holding it.

pub mod cursors;
pub mod lock_table;
pub mod object_store;
pub mod sessions;

use crate::models::{InitMessage, SessionId};
use cursors::CursorMap;
use lock_table::LockTable;
use object_store::ObjectStore;
use sessions::SessionRegistry;

#[derive(Debug)]
pub struct Board {
    pub objects: ObjectStore,
    pub locks: LockTable,
    pub cursors: CursorMap,
    pub sessions: SessionRegistry,
}

/// Entry counts, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStats {
    pub sessions: usize,
    pub objects: usize,
    pub locks: usize,
    pub cursors: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            objects: ObjectStore::new(),
            locks: LockTable::new(),
            cursors: CursorMap::new(),
            sessions: SessionRegistry::new(),
        }
    }

    /// Full state as seen by `session` at this instant.
    pub fn snapshot_for(&self, session: &SessionId) -> InitMessage {
        InitMessage {
            session_id: session.clone(),
            objects: self.objects.snapshot(),
            cursors: self.cursors.snapshot(),
            locks: self.locks.snapshot(),
        }
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats {
            sessions: self.sessions.len(),
            objects: self.objects.len(),
            locks: self.locks.len(),
            cursors: self.cursors.len(),
        }
    }
}
