mod peer_transport;
mod rtc_transport;
mod transport_config;

pub use peer_transport::*;
pub use rtc_transport::*;
pub use transport_config::*;
