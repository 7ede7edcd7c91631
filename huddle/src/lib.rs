pub use huddle_core::model::PeerId;

pub mod model {
    pub use huddle_core::model::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use huddle_session::*;
}
