
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Level;

use anyhow::Context;
use async_trait::async_trait;
use huddle_core::{PeerId, PresenceMeta, RoomId, SessionDescription, SignalMessage, TrackKind};
use huddle_session::media::{CaptureError, LocalTrack, MediaCapture, StaticCapture};
use huddle_session::rendezvous::{ChannelEvent, RendezvousHub};
use huddle_session::session::{RoomSession, SessionCommand, SessionConfig};

use crate::utils::{MockChannel, MockTransportFactory, RecordingObserver};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn default_tracks() -> Vec<Arc<LocalTrack>> {
    vec![
        LocalTrack::detached("local-audio", TrackKind::Audio),
        LocalTrack::detached("local-video", TrackKind::Video),
    ]
}

struct DeniedCapture;

#[async_trait]
impl MediaCapture for DeniedCapture {
    async fn capture(&self) -> Result<Vec<Arc<LocalTrack>>, CaptureError> {
        Err(CaptureError::Denied("permission dismissed".into()))
    }
}

/// A session driven through a MockChannel: the test injects channel events
/// through `events_tx` and inspects outgoing broadcasts on `channel`.
pub struct TestSession {
    pub local_id: PeerId,
    pub cmd_tx: mpsc::Sender<SessionCommand>,
    pub events_tx: mpsc::UnboundedSender<ChannelEvent>,
    pub channel: MockChannel,
    pub factory: Arc<MockTransportFactory>,
    pub observer: RecordingObserver,
    pub tracks: Vec<Arc<LocalTrack>>,
    pub handle: JoinHandle<()>,
}

impl TestSession {
    pub fn inject(&self, event: ChannelEvent) {
        let _ = self.events_tx.send(event);
    }

    pub fn inject_signal(&self, msg: SignalMessage) {
        self.inject(ChannelEvent::Signal(msg));
    }

    pub async fn leave(self) {
        let _ = self.cmd_tx.send(SessionCommand::Leave).await;
        let _ = self.handle.await;
    }
}

/// Drives an inbound offer from `name` into the session and waits for the
/// transport it creates in response.
pub async fn seed_responder_peer(
    session: &TestSession,
    name: &str,
) -> anyhow::Result<crate::utils::TransportHandle> {
    let peer = PeerId::from(name);
    session.inject_signal(SignalMessage::Offer {
        offer: SessionDescription::offer(format!("offer:{name}->{}", session.local_id)),
        to: session.local_id.clone(),
        from: peer.clone(),
    });
    session
        .factory
        .wait_for_transport(&peer, 5000)
        .await
        .with_context(|| format!("no transport created for seeded peer {name}"))
}

pub fn spawn_session(local: &str) -> TestSession {
    spawn_session_with(local, MockTransportFactory::new(local), default_tracks())
}

pub fn spawn_session_with(
    local: &str,
    factory: MockTransportFactory,
    tracks: Vec<Arc<LocalTrack>>,
) -> TestSession {
    let (events_tx, channel_rx) = mpsc::unbounded_channel();
    let channel = MockChannel::new();
    let factory = Arc::new(factory);
    let observer = RecordingObserver::new();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let session = RoomSession::new(
        SessionConfig {
            local_id: PeerId::from(local),
            meta: PresenceMeta::default(),
        },
        Arc::new(channel.clone()),
        channel_rx,
        Arc::new(StaticCapture::new(tracks.clone())),
        factory.clone(),
        Box::new(observer.clone()),
        cmd_rx,
    );
    let handle = tokio::spawn(session.run());

    TestSession {
        local_id: PeerId::from(local),
        cmd_tx,
        events_tx,
        channel,
        factory,
        observer,
        tracks,
        handle,
    }
}

/// Like [`spawn_session`] but with a capture source that denies permission.
pub fn spawn_session_denied_media(local: &str) -> TestSession {
    let (events_tx, channel_rx) = mpsc::unbounded_channel();
    let channel = MockChannel::new();
    let factory = Arc::new(MockTransportFactory::new(local));
    let observer = RecordingObserver::new();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let session = RoomSession::new(
        SessionConfig {
            local_id: PeerId::from(local),
            meta: PresenceMeta::default(),
        },
        Arc::new(channel.clone()),
        channel_rx,
        Arc::new(DeniedCapture),
        factory.clone(),
        Box::new(observer.clone()),
        cmd_rx,
    );
    let handle = tokio::spawn(session.run());

    TestSession {
        local_id: PeerId::from(local),
        cmd_tx,
        events_tx,
        channel,
        factory,
        observer,
        tracks: Vec::new(),
        handle,
    }
}

/// A session wired to a real in-process rendezvous hub.
pub struct HubSession {
    pub local_id: PeerId,
    pub cmd_tx: mpsc::Sender<SessionCommand>,
    pub factory: Arc<MockTransportFactory>,
    pub observer: RecordingObserver,
    pub handle: JoinHandle<()>,
}

impl HubSession {
    pub async fn leave(self) {
        let _ = self.cmd_tx.send(SessionCommand::Leave).await;
        let _ = self.handle.await;
    }
}

pub fn spawn_hub_session(hub: &RendezvousHub, room: &RoomId, local: &str) -> HubSession {
    let local_id = PeerId::from(local);
    let (channel, channel_rx) = hub.join(room, local_id.clone());
    let factory = Arc::new(MockTransportFactory::new(local));
    let observer = RecordingObserver::new();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let session = RoomSession::new(
        SessionConfig {
            local_id: local_id.clone(),
            meta: PresenceMeta::default(),
        },
        Arc::new(channel),
        channel_rx,
        Arc::new(StaticCapture::new(default_tracks())),
        factory.clone(),
        Box::new(observer.clone()),
        cmd_rx,
    );
    let handle = tokio::spawn(session.run());

    HubSession {
        local_id,
        cmd_tx,
        factory,
        observer,
        handle,
    }
}
