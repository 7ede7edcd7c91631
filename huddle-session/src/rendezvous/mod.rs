mod channel;
mod hub;

pub use channel::*;
pub use hub::*;
