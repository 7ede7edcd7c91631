use serde::{Deserialize, Serialize};
use std::fmt;

/// A remote participant's identifier within a room: the self-chosen
/// display/session key the participant tracks presence under.
///
/// Lexicographic ordering is meaningful: when two participants discover each
/// other, the side with the lower id takes the initiator role.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PeerId(pub String);

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a single peer transport session. `Closed` is reachable from
/// every other state (leave, explicit close, terminal ICE failure). There is
/// no transition out of `Closed`; a reconnect is a fresh `New` session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Negotiating,
    Connected,
    Closed,
}

/// Media kind of a captured local track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Opaque identity handle for the media stream received from a remote peer.
/// Two arrivals with the same `id` are the same logical stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream {
    pub id: String,
}

impl RemoteStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
