use crate::media::LocalTrack;
use crate::transport::{
    PeerTransport, TransportConfig, TransportError, TransportEvent, TransportFactory,
};
use async_trait::async_trait;
use huddle_core::{
    IceCandidate, PeerId, PeerState, RemoteStream, SdpType, SessionDescription,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_remote::TrackRemote;

/// Production [`PeerTransport`] over webrtc-rs.
pub struct RtcTransport {
    peer_id: PeerId,
    peer_connection: Arc<RTCPeerConnection>,
}

/// Creates [`RtcTransport`]s with a shared ICE configuration.
#[derive(Default)]
pub struct RtcTransportFactory {
    config: TransportConfig,
}

impl RtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        peer_id: PeerId,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>, TransportError> {
        let transport = RtcTransport::new(peer_id, self.config.clone(), event_tx).await?;
        Ok(Box::new(transport))
    }
}

impl RtcTransport {
    pub async fn new(
        peer_id: PeerId,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }],
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .map_err(|e| TransportError::Setup(e.to_string()))?,
        );

        // Connection state: surface Connected, and collapse every terminal
        // state onto Closed. The session does not renegotiate after failure.
        let state_tx = event_tx.clone();
        let peer_state = peer_id.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer = peer_state.clone();

                Box::pin(async move {
                    info!("Connection state for {}: {:?}", peer, s);
                    match s {
                        RTCPeerConnectionState::Connected => {
                            let _ = tx
                                .send(TransportEvent::StateChanged(peer, PeerState::Connected))
                                .await;
                        }
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            let _ = tx
                                .send(TransportEvent::StateChanged(peer, PeerState::Closed))
                                .await;
                        }
                        _ => {}
                    }
                })
            },
        ));

        // Trickle ICE: relay candidates the moment they are discovered.
        let ice_tx = event_tx.clone();
        let peer_ice = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = peer_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_mline_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateDiscovered(peer, candidate))
                    .await;
            })
        }));

        // Remote media: surface the stream identity so repeated arrivals of
        // the same stream stay a no-op upstream.
        let track_tx = event_tx.clone();
        let peer_track = peer_id.clone();
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _, _| {
            let tx = track_tx.clone();
            let peer = peer_track.clone();

            Box::pin(async move {
                debug!("Remote track from {}: stream {}", peer, track.stream_id());
                let stream = RemoteStream::new(track.stream_id());
                let _ = tx.send(TransportEvent::TrackReceived(peer, stream)).await;
            })
        }));

        Ok(Self {
            peer_id,
            peer_connection,
        })
    }
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        let desc = match desc.kind {
            SdpType::Offer => RTCSessionDescription::offer(desc.sdp),
            SdpType::Answer => RTCSessionDescription::answer(desc.sdp),
        }
        .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_mline_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(|e| TransportError::Candidate(e.to_string()))
    }

    async fn add_local_track(&self, track: Arc<LocalTrack>) -> Result<(), TransportError> {
        let Some(rtc_track) = track.rtc() else {
            // Placeholder tracks (tests, degraded capture) have no RTP source.
            warn!(
                "Local track {} has no RTP source; skipping attach for {}",
                track.id(),
                self.peer_id
            );
            return Ok(());
        };
        self.peer_connection
            .add_track(rtc_track)
            .await
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.peer_connection
            .close()
            .await
            .map_err(|_| TransportError::Closed)
    }
}
