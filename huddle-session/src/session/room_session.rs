use crate::media::{LocalMedia, LocalTrack, MediaCapture};
use crate::rendezvous::{ChannelEvent, RendezvousChannel};
use crate::session::{
    PeerRegistry, SessionCommand, SessionObserver, initiates_toward, sync_removals,
};
use crate::transport::{TransportEvent, TransportFactory};
use huddle_core::{
    IceCandidate, PeerId, PeerState, PresenceEvent, PresenceMeta, SessionDescription,
    SignalMessage,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct SessionConfig {
    /// The local participant's presence key. Lexicographic order against a
    /// remote id decides which side initiates negotiation.
    pub local_id: PeerId,
    pub meta: PresenceMeta,
}

/// One participant's view of one room: a single event loop that turns
/// presence into roster changes, runs offer/answer/candidate exchange per
/// peer, and owns every transport for the life of the visit.
///
/// All state lives on this one task. Negotiation steps are awaited inline, so
/// between suspension points mutations are atomic; transport events that
/// arrive for a peer already evicted fall through as no-ops.
pub struct RoomSession {
    local_id: PeerId,
    meta: PresenceMeta,
    registry: PeerRegistry,
    media: Option<LocalMedia>,
    channel: Arc<dyn RendezvousChannel>,
    channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
    capture: Arc<dyn MediaCapture>,
    factory: Arc<dyn TransportFactory>,
    observer: Box<dyn SessionObserver>,
    command_rx: mpsc::Receiver<SessionCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
}

impl RoomSession {
    pub fn new(
        config: SessionConfig,
        channel: Arc<dyn RendezvousChannel>,
        channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
        capture: Arc<dyn MediaCapture>,
        factory: Arc<dyn TransportFactory>,
        observer: Box<dyn SessionObserver>,
        command_rx: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        let (transport_tx, transport_rx) = mpsc::channel(256);

        Self {
            local_id: config.local_id,
            meta: config.meta,
            registry: PeerRegistry::new(),
            media: None,
            channel,
            channel_rx,
            capture,
            factory,
            observer,
            command_rx,
            transport_rx,
            transport_tx,
        }
    }

    pub async fn run(mut self) {
        info!("Room session started for {}", self.local_id);

        // Capture failure is degraded mode, never fatal: the room still
        // works for text and for receiving remote media.
        match self.capture.capture().await {
            Ok(tracks) => {
                self.media = Some(LocalMedia::new(tracks));
                self.observer.on_local_media(true).await;
            }
            Err(e) => {
                warn!("Local capture unavailable, continuing without media: {}", e);
                self.observer.on_local_media(false).await;
            }
        }

        if let Err(e) = self.channel.track(self.meta.clone()).await {
            warn!("Failed to announce presence: {}", e);
        }

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::ToggleMute) => {
                        if let Some(media) = &mut self.media {
                            let muted = media.toggle_mute();
                            debug!("Audio {}", if muted { "muted" } else { "live" });
                        }
                    }
                    Some(SessionCommand::ToggleVideo) => {
                        if let Some(media) = &mut self.media {
                            let off = media.toggle_video();
                            debug!("Video {}", if off { "off" } else { "live" });
                        }
                    }
                    Some(SessionCommand::Leave) | None => {
                        info!("Leaving room");
                        break;
                    }
                },

                evt = self.channel_rx.recv() => match evt {
                    Some(ChannelEvent::Presence(presence)) => self.handle_presence(presence).await,
                    Some(ChannelEvent::Signal(signal)) => self.handle_signal(signal).await,
                    None => {
                        info!("Rendezvous channel closed; shutting down session");
                        break;
                    }
                },

                evt = self.transport_rx.recv() => {
                    // never None: the session keeps a sender alive
                    if let Some(event) = evt {
                        self.handle_transport_event(event).await;
                    }
                }
            }
        }

        self.teardown().await;
        info!("Room session finished for {}", self.local_id);
    }

    async fn handle_presence(&mut self, event: PresenceEvent) {
        match event {
            // Sync only ever removes: additions race with negotiation and are
            // left to join events.
            PresenceEvent::Sync { peers } => {
                for peer_id in sync_removals(&self.registry.peer_ids(), &peers, &self.local_id) {
                    info!("Peer {} absent from presence sync; closing", peer_id);
                    if self.registry.close(&peer_id).await {
                        self.observer.on_peer_left(peer_id).await;
                    }
                }
            }

            PresenceEvent::Join { peer, .. } => {
                if peer == self.local_id {
                    return;
                }
                if initiates_toward(&self.local_id, &peer) {
                    info!("Peer {} joined; taking initiator role", peer);
                    self.initiate(peer).await;
                } else {
                    debug!("Peer {} joined; awaiting their offer", peer);
                }
            }

            PresenceEvent::Leave { peer } => {
                if peer == self.local_id {
                    return;
                }
                if self.registry.close(&peer).await {
                    info!("Peer {} left", peer);
                    self.observer.on_peer_left(peer).await;
                }
            }
        }
    }

    async fn handle_signal(&mut self, msg: SignalMessage) {
        // Room-scoped broadcast reaches everyone; drop anything not addressed
        // to this participant.
        if msg.to() != &self.local_id {
            return;
        }

        match msg {
            SignalMessage::Offer { offer, from, .. } => self.handle_offer(from, offer).await,
            SignalMessage::Answer { answer, from, .. } => self.handle_answer(from, answer).await,
            SignalMessage::IceCandidate { candidate, from, .. } => {
                self.handle_candidate(from, candidate).await
            }
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateDiscovered(peer_id, candidate) => {
                // Suppressed once the peer is gone: no messages to absent peers.
                if !self.registry.contains(&peer_id) {
                    return;
                }
                self.send(SignalMessage::IceCandidate {
                    candidate,
                    to: peer_id,
                    from: self.local_id.clone(),
                })
                .await;
            }

            TransportEvent::TrackReceived(peer_id, stream) => {
                if self.registry.set_remote_stream(&peer_id, stream.clone()) {
                    info!("Remote stream {} from {}", stream.id, peer_id);
                    self.observer.on_remote_stream(peer_id, stream).await;
                }
            }

            TransportEvent::StateChanged(peer_id, PeerState::Connected) => {
                if self.registry.contains(&peer_id) {
                    self.registry.set_state(&peer_id, PeerState::Connected);
                    self.observer.on_peer_connected(peer_id).await;
                }
            }

            // Terminal transport failure: close and evict, no renegotiation.
            // A reconnect arrives as a fresh presence join.
            TransportEvent::StateChanged(peer_id, PeerState::Closed) => {
                if self.registry.close(&peer_id).await {
                    warn!("Transport to {} closed", peer_id);
                    self.observer.on_peer_left(peer_id).await;
                }
            }

            TransportEvent::StateChanged(peer_id, state) => {
                self.registry.set_state(&peer_id, state);
            }
        }
    }

    /// Initiator path: create (or reuse) the transport, produce an offer and
    /// relay it. Idempotent creation makes a duplicate initiation harmless.
    async fn initiate(&mut self, peer_id: PeerId) {
        if !self.ensure_peer(&peer_id).await {
            return;
        }

        let offer = {
            let Some(transport) = self.registry.transport(&peer_id) else {
                return;
            };
            match transport.create_offer().await {
                Ok(offer) => offer,
                Err(e) => {
                    warn!("Failed to create offer for {}: {}", peer_id, e);
                    return;
                }
            }
        };

        self.registry.set_state(&peer_id, PeerState::Negotiating);
        self.send(SignalMessage::Offer {
            offer,
            to: peer_id,
            from: self.local_id.clone(),
        })
        .await;
    }

    /// Responder path. An offer from an unknown peer creates the entry on
    /// demand; robustness favors session creation over strict ordering.
    async fn handle_offer(&mut self, from: PeerId, offer: SessionDescription) {
        if !self.ensure_peer(&from).await {
            return;
        }
        self.registry.set_state(&from, PeerState::Negotiating);

        match self.registry.apply_remote_description(&from, offer).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                warn!("Failed to apply offer from {}: {}", from, e);
                return;
            }
        }

        let answer = {
            let Some(transport) = self.registry.transport(&from) else {
                return;
            };
            match transport.create_answer().await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!("Failed to create answer for {}: {}", from, e);
                    return;
                }
            }
        };

        self.send(SignalMessage::Answer {
            answer,
            to: from,
            from: self.local_id.clone(),
        })
        .await;
    }

    async fn handle_answer(&mut self, from: PeerId, answer: SessionDescription) {
        if !self.registry.contains(&from) {
            // an answer carries no offer to respond to; nothing to create
            warn!("Answer from unknown peer {} dropped", from);
            return;
        }
        if let Err(e) = self.registry.apply_remote_description(&from, answer).await {
            warn!("Failed to apply answer from {}: {}", from, e);
        }
    }

    async fn handle_candidate(&mut self, from: PeerId, candidate: IceCandidate) {
        if !self.registry.contains(&from) {
            debug!("Candidate from unknown peer {} dropped", from);
            return;
        }
        if let Err(e) = self.registry.push_candidate(&from, candidate).await {
            warn!("Failed to apply candidate from {}: {}", from, e);
        }
    }

    /// Idempotent create + roster insert; raises `on_peer_added` exactly once
    /// per peer. Returns `false` only when transport creation failed.
    async fn ensure_peer(&mut self, peer_id: &PeerId) -> bool {
        let tracks = self.local_tracks();
        match self
            .registry
            .ensure(
                peer_id,
                self.factory.as_ref(),
                self.transport_tx.clone(),
                &tracks,
            )
            .await
        {
            Ok(created) => {
                if created {
                    self.observer.on_peer_added(peer_id.clone()).await;
                }
                true
            }
            Err(e) => {
                warn!("Failed to create transport for {}: {}", peer_id, e);
                false
            }
        }
    }

    fn local_tracks(&self) -> Vec<Arc<LocalTrack>> {
        self.media
            .as_ref()
            .map(|m| m.tracks().to_vec())
            .unwrap_or_default()
    }

    async fn send(&self, msg: SignalMessage) {
        if let Err(e) = self.channel.broadcast(msg).await {
            warn!("Failed to relay signaling message: {}", e);
        }
    }

    /// Local tracks stop first and unconditionally; transport closes follow
    /// and individual failures never leave a track running.
    async fn teardown(&mut self) {
        if let Some(media) = &self.media {
            media.stop_all();
        }
        self.registry.close_all().await;
        self.channel.unsubscribe().await;
    }
}
