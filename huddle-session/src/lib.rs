pub mod directory;
pub mod media;
pub mod rendezvous;
pub mod session;
pub mod transport;

pub use directory::{DirectoryError, MemoryDirectory, RoomDirectory};
pub use media::{CaptureError, LocalMedia, LocalTrack, MediaCapture, StaticCapture};
pub use rendezvous::{ChannelError, ChannelEvent, RendezvousChannel, RendezvousHub};
pub use session::{
    PeerRegistry, RoomSession, SessionCommand, SessionConfig, SessionObserver,
};
pub use transport::{
    PeerTransport, RtcTransportFactory, TransportConfig, TransportError, TransportEvent,
    TransportFactory,
};
