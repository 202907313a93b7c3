pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod msg_cursor_handler;
pub mod msg_lock_handler;
pub mod msg_object_handler;
pub mod msg_ping_handler;
pub mod session_handler;

pub use handler::websocket_handler;
