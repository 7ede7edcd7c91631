pub mod model;

pub use model::{
    CreatedRoom, HostToken, IceCandidate, PeerId, PeerState, PresenceEvent, PresenceMeta,
    RemoteStream, Room, RoomId, RoomKind, SdpType, SessionDescription, SignalMessage, TrackKind,
};
