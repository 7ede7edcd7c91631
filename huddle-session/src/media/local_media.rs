use async_trait::async_trait;
use huddle_core::TrackKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use webrtc::track::track_local::TrackLocal;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("media capture denied: {0}")]
    Denied(String),
    #[error("no capture device available")]
    NoDevice,
}

/// One captured local track. The same `Arc<LocalTrack>` is attached to every
/// peer transport; only the owning session stops it, and only at teardown.
/// Mute/video-off flip `enabled` and never touch the capture itself.
pub struct LocalTrack {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
    stopped: AtomicBool,
    rtc: Option<Arc<dyn TrackLocal + Send + Sync>>,
}

impl LocalTrack {
    /// A track with no RTP source behind it (tests, degraded capture).
    pub fn detached(id: impl Into<String>, kind: TrackKind) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            kind,
            enabled: AtomicBool::new(true),
            stopped: AtomicBool::new(false),
            rtc: None,
        })
    }

    pub fn with_rtc(
        id: impl Into<String>,
        kind: TrackKind,
        rtc: Arc<dyn TrackLocal + Send + Sync>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            kind,
            enabled: AtomicBool::new(true),
            stopped: AtomicBool::new(false),
            rtc: Some(rtc),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn rtc(&self) -> Option<Arc<dyn TrackLocal + Send + Sync>> {
        self.rtc.clone()
    }
}

/// Source of the local participant's captured media. Capture may fail
/// (permission denied, no device); the session treats that as degraded mode,
/// not a fatal error.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn capture(&self) -> Result<Vec<Arc<LocalTrack>>, CaptureError>;
}

/// Capture source over pre-built tracks, the way static sample tracks are fed
/// in tests and demos.
pub struct StaticCapture {
    tracks: Vec<Arc<LocalTrack>>,
}

impl StaticCapture {
    pub fn new(tracks: Vec<Arc<LocalTrack>>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl MediaCapture for StaticCapture {
    async fn capture(&self) -> Result<Vec<Arc<LocalTrack>>, CaptureError> {
        Ok(self.tracks.clone())
    }
}

/// The local participant's media for one room visit: captured once on entry,
/// stopped once at teardown.
pub struct LocalMedia {
    tracks: Vec<Arc<LocalTrack>>,
    muted: bool,
    video_off: bool,
}

impl LocalMedia {
    pub fn new(tracks: Vec<Arc<LocalTrack>>) -> Self {
        Self {
            tracks,
            muted: false,
            video_off: false,
        }
    }

    pub fn tracks(&self) -> &[Arc<LocalTrack>] {
        &self.tracks
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_video_off(&self) -> bool {
        self.video_off
    }

    /// Flip audio enablement. Local-only: no capture restart, no
    /// renegotiation; remote sides keep receiving a (silent) track.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        for track in self.tracks.iter().filter(|t| t.kind() == TrackKind::Audio) {
            track.set_enabled(!self.muted);
        }
        self.muted
    }

    /// Flip video enablement; same local-only semantics as mute.
    pub fn toggle_video(&mut self) -> bool {
        self.video_off = !self.video_off;
        for track in self.tracks.iter().filter(|t| t.kind() == TrackKind::Video) {
            track.set_enabled(!self.video_off);
        }
        self.video_off
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}
