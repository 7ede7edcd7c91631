use async_trait::async_trait;
use huddle_core::{CreatedRoom, HostToken, Room, RoomId, RoomKind};
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("room not found")]
    NotFound,
    #[error("host token rejected")]
    Forbidden,
}

/// Room bookkeeping the session core consumes but does not own: creation,
/// lookup, host-authorized deletion, and a deletion feed the UI layer uses to
/// force-exit participants when a host ends a room.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn create(
        &self,
        name: &str,
        kind: RoomKind,
        password: Option<&str>,
    ) -> Result<CreatedRoom, DirectoryError>;

    async fn get(&self, room_id: &RoomId) -> Result<Room, DirectoryError>;

    async fn verify_password(
        &self,
        room_id: &RoomId,
        password: Option<&str>,
    ) -> Result<bool, DirectoryError>;

    /// Delete a room; requires the host token handed out at creation.
    async fn delete(&self, room_id: &RoomId, token: &HostToken) -> Result<(), DirectoryError>;

    fn subscribe_deletions(&self) -> broadcast::Receiver<RoomId>;
}
