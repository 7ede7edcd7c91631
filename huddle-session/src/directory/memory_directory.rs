use crate::directory::{DirectoryError, RoomDirectory};
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::{CreatedRoom, HostToken, Room, RoomId, RoomKind};
use tokio::sync::broadcast;
use tracing::info;

struct StoredRoom {
    room: Room,
    password: Option<String>,
    host_token: HostToken,
}

/// In-memory [`RoomDirectory`]. Rooms are ephemeral by design, so a process
/// map is a complete implementation for single-node deployments and tests; a
/// persistent backend implements the same trait.
pub struct MemoryDirectory {
    rooms: DashMap<RoomId, StoredRoom>,
    deletions: broadcast::Sender<RoomId>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        let (deletions, _) = broadcast::channel(64);
        Self {
            rooms: DashMap::new(),
            deletions,
        }
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomDirectory for MemoryDirectory {
    async fn create(
        &self,
        name: &str,
        kind: RoomKind,
        password: Option<&str>,
    ) -> Result<CreatedRoom, DirectoryError> {
        let room = Room {
            id: RoomId::new(),
            name: name.to_string(),
            kind,
            has_password: password.is_some(),
        };
        let host_token = HostToken::new();

        info!("Created room {:?} ({})", room.id, name);
        self.rooms.insert(
            room.id.clone(),
            StoredRoom {
                room: room.clone(),
                password: password.map(str::to_string),
                host_token: host_token.clone(),
            },
        );

        Ok(CreatedRoom { room, host_token })
    }

    async fn get(&self, room_id: &RoomId) -> Result<Room, DirectoryError> {
        self.rooms
            .get(room_id)
            .map(|e| e.room.clone())
            .ok_or(DirectoryError::NotFound)
    }

    async fn verify_password(
        &self,
        room_id: &RoomId,
        password: Option<&str>,
    ) -> Result<bool, DirectoryError> {
        let stored = self.rooms.get(room_id).ok_or(DirectoryError::NotFound)?;
        Ok(stored.password.as_deref() == password)
    }

    async fn delete(&self, room_id: &RoomId, token: &HostToken) -> Result<(), DirectoryError> {
        let stored = self.rooms.get(room_id).ok_or(DirectoryError::NotFound)?;
        if &stored.host_token != token {
            return Err(DirectoryError::Forbidden);
        }
        drop(stored);

        self.rooms.remove(room_id);
        info!("Deleted room {:?}", room_id);
        let _ = self.deletions.send(room_id.clone());
        Ok(())
    }

    fn subscribe_deletions(&self) -> broadcast::Receiver<RoomId> {
        self.deletions.subscribe()
    }
}
