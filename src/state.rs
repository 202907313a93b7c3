use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::board::Board;
use crate::config::Config;

/// Shared state for all connections and HTTP handlers.
///
/// The board mutex serializes every connect, message and disconnect.
pub struct AppState {
    pub config: Config,
    pub board: Mutex<Board>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            board: Mutex::new(Board::new()),
            started_at: Utc::now(),
        }
    }
}
