use crate::media::LocalTrack;
use async_trait::async_trait;
use huddle_core::{IceCandidate, PeerId, PeerState, RemoteStream, SessionDescription};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport setup failed: {0}")]
    Setup(String),
    #[error("negotiation step failed: {0}")]
    Negotiation(String),
    #[error("rejected ICE candidate: {0}")]
    Candidate(String),
    #[error("transport closed")]
    Closed,
}

/// Events a transport pushes into the owning session's event loop.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A locally discovered ICE candidate, ready to be relayed to the peer.
    CandidateDiscovered(PeerId, IceCandidate),
    /// Remote media arrived; carries the stream identity.
    TrackReceived(PeerId, RemoteStream),
    /// The underlying connection state moved (Connected, or Closed on
    /// failure/disconnect).
    StateChanged(PeerId, PeerState),
}

/// One peer's transport session. Offer/answer creation also installs the
/// produced description as the local description, mirroring the negotiation
/// steps of the signaling exchange one-to-one.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError>;

    /// Attach an already-captured local track. The same track handle is
    /// shared across every transport in the session.
    async fn add_local_track(&self, track: Arc<LocalTrack>) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Creates transports for the session. `event_tx` is the session's transport
/// event channel; the transport emits into it for the whole of its life.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        peer_id: PeerId,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, TransportError>;
}
