pub mod canvas;
pub mod messages;
pub mod health;
pub mod ready;
pub mod diagnostics;

pub use canvas::*;
pub use messages::*;
pub use health::*;
pub use ready::*;
pub use diagnostics::*;
