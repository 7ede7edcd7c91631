use crate::media::LocalTrack;
use crate::transport::{PeerTransport, TransportError, TransportEvent, TransportFactory};
use huddle_core::{IceCandidate, PeerId, PeerState, RemoteStream, SessionDescription};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct PeerEntry {
    transport: Box<dyn PeerTransport>,
    state: PeerState,
    remote_description_set: bool,
    pending_candidates: Vec<IceCandidate>,
    remote_stream: Option<RemoteStream>,
}

/// Owned mapping from peer id to live transport session. One registry per
/// room session; never shared, never global.
///
/// Invariants held here: at most one transport per peer (creation is
/// idempotent), the pending-candidate queue is non-empty only while no
/// remote description is set and drains entirely the moment one is applied,
/// and eviction always closes the transport first.
pub struct PeerRegistry {
    peers: HashMap<PeerId, PeerEntry>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            peers: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.keys().cloned().collect()
    }

    pub fn state(&self, peer_id: &PeerId) -> Option<PeerState> {
        self.peers.get(peer_id).map(|e| e.state)
    }

    pub fn set_state(&mut self, peer_id: &PeerId, state: PeerState) {
        if let Some(entry) = self.peers.get_mut(peer_id) {
            entry.state = state;
        }
    }

    pub fn remote_stream(&self, peer_id: &PeerId) -> Option<&RemoteStream> {
        self.peers.get(peer_id).and_then(|e| e.remote_stream.as_ref())
    }

    pub fn has_remote_description(&self, peer_id: &PeerId) -> bool {
        self.peers
            .get(peer_id)
            .is_some_and(|e| e.remote_description_set)
    }

    pub fn pending_candidates(&self, peer_id: &PeerId) -> usize {
        self.peers
            .get(peer_id)
            .map_or(0, |e| e.pending_candidates.len())
    }

    pub fn transport(&self, peer_id: &PeerId) -> Option<&dyn PeerTransport> {
        self.peers.get(peer_id).map(|e| e.transport.as_ref())
    }

    /// Return the existing transport or create one. Creation and roster entry
    /// insertion are a single step, and every currently-captured local track
    /// is attached before the entry becomes visible, so a late joiner gets
    /// media without a second negotiation round.
    ///
    /// Returns `true` when a new entry was created.
    pub async fn ensure(
        &mut self,
        peer_id: &PeerId,
        factory: &dyn TransportFactory,
        event_tx: mpsc::Sender<TransportEvent>,
        local_tracks: &[Arc<LocalTrack>],
    ) -> Result<bool, TransportError> {
        if self.peers.contains_key(peer_id) {
            return Ok(false);
        }

        let transport = factory.create(peer_id.clone(), event_tx).await?;
        for track in local_tracks.iter().filter(|t| !t.is_stopped()) {
            transport.add_local_track(track.clone()).await?;
        }

        self.peers.insert(
            peer_id.clone(),
            PeerEntry {
                transport,
                state: PeerState::New,
                remote_description_set: false,
                pending_candidates: Vec::new(),
                remote_stream: None,
            },
        );
        Ok(true)
    }

    /// Apply a remote description and drain every queued candidate, in
    /// arrival order. A failed candidate is logged and skipped; it never
    /// blocks the rest of the queue. Returns `false` for unknown peers.
    pub async fn apply_remote_description(
        &mut self,
        peer_id: &PeerId,
        desc: SessionDescription,
    ) -> Result<bool, TransportError> {
        let Some(entry) = self.peers.get_mut(peer_id) else {
            return Ok(false);
        };

        entry.transport.set_remote_description(desc).await?;
        entry.remote_description_set = true;

        for candidate in entry.pending_candidates.drain(..) {
            if let Err(e) = entry.transport.add_ice_candidate(candidate).await {
                warn!("Dropping queued candidate for {}: {}", peer_id, e);
            }
        }
        Ok(true)
    }

    /// Apply a remote candidate now if a remote description is set, otherwise
    /// queue it. Unknown peers are ignored. Returns `true` when the candidate
    /// was applied immediately.
    pub async fn push_candidate(
        &mut self,
        peer_id: &PeerId,
        candidate: IceCandidate,
    ) -> Result<bool, TransportError> {
        let Some(entry) = self.peers.get_mut(peer_id) else {
            debug!("Candidate for unknown peer {} ignored", peer_id);
            return Ok(false);
        };

        if entry.remote_description_set {
            entry.transport.add_ice_candidate(candidate).await?;
            Ok(true)
        } else {
            entry.pending_candidates.push(candidate);
            Ok(false)
        }
    }

    /// Record the remote stream for a peer. Stream identity is compared:
    /// re-arrival of the same logical stream is a no-op. Returns `true` when
    /// the surfaced stream changed.
    pub fn set_remote_stream(&mut self, peer_id: &PeerId, stream: RemoteStream) -> bool {
        let Some(entry) = self.peers.get_mut(peer_id) else {
            return false;
        };
        if entry.remote_stream.as_ref() == Some(&stream) {
            return false;
        }
        entry.remote_stream = Some(stream);
        true
    }

    /// Close and evict a peer. Safe on unknown or already-closed peers.
    /// Returns `true` when an entry was actually removed.
    pub async fn close(&mut self, peer_id: &PeerId) -> bool {
        let Some(entry) = self.peers.remove(peer_id) else {
            return false;
        };
        if let Err(e) = entry.transport.close().await {
            warn!("Closing transport for {} failed: {}", peer_id, e);
        }
        true
    }

    /// Close every transport and clear the roster. Individual close failures
    /// are logged and never short-circuit the rest.
    pub async fn close_all(&mut self) {
        for (peer_id, entry) in self.peers.drain() {
            if let Err(e) = entry.transport.close().await {
                warn!("Closing transport for {} failed: {}", peer_id, e);
            }
        }
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
