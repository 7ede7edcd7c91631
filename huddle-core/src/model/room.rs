use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct RoomId(pub Uuid);

impl RoomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability token returned to the room creator; required to delete the room.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct HostToken(pub Uuid);

impl HostToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HostToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Text,
    Video,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub kind: RoomKind,
    pub has_password: bool,
}

#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub room: Room,
    pub host_token: HostToken,
}
