mod observer;
mod reconciler;
mod registry;
mod room_session;
mod session_command;

pub use observer::*;
pub use reconciler::*;
pub use registry::*;
pub use room_session::*;
pub use session_command::*;
