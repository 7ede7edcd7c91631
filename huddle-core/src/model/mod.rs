mod peer;
mod presence;
mod room;
mod signaling;

pub use peer::{PeerId, PeerState, RemoteStream, TrackKind};
pub use presence::{PresenceEvent, PresenceMeta};
pub use room::{CreatedRoom, HostToken, Room, RoomId, RoomKind};
pub use signaling::{IceCandidate, SdpType, SessionDescription, SignalMessage};
