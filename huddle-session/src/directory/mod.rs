mod memory_directory;
mod room_directory;

pub use memory_directory::*;
pub use room_directory::*;
