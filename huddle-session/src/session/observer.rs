use async_trait::async_trait;
use huddle_core::{PeerId, RemoteStream};

/// Callbacks a room session raises toward its UI layer. All methods default
/// to no-ops so an observer implements only what it renders.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    /// A roster entry now exists for this peer (negotiation may still be in
    /// flight).
    async fn on_peer_added(&self, _peer_id: PeerId) {}

    /// The transport to this peer reached `Connected`.
    async fn on_peer_connected(&self, _peer_id: PeerId) {}

    /// The peer's media stream arrived or changed identity.
    async fn on_remote_stream(&self, _peer_id: PeerId, _stream: RemoteStream) {}

    /// The peer was closed and evicted (leave, sync removal, or transport
    /// failure).
    async fn on_peer_left(&self, _peer_id: PeerId) {}

    /// Local capture outcome: `false` means degraded mode (no local media;
    /// the room still works for receiving).
    async fn on_local_media(&self, _available: bool) {}
}
