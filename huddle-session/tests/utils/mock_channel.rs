use async_trait::async_trait;
use huddle_core::{PeerId, PresenceMeta, SignalMessage};
use huddle_session::rendezvous::{ChannelError, RendezvousChannel};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Mock RendezvousChannel that records every outgoing broadcast. Inbound
/// events are injected by the test through the `mpsc` sender it keeps paired
/// with the session's receiver.
#[derive(Clone, Default)]
pub struct MockChannel {
    broadcasts: Arc<Mutex<Vec<SignalMessage>>>,
    tracked: Arc<AtomicBool>,
    unsubscribed: Arc<AtomicBool>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn broadcasts(&self) -> Vec<SignalMessage> {
        self.broadcasts.lock().await.clone()
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked.load(Ordering::Relaxed)
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed.load(Ordering::Relaxed)
    }

    /// All recorded broadcasts addressed to `peer_id`.
    pub async fn sent_to(&self, peer_id: &PeerId) -> Vec<SignalMessage> {
        self.broadcasts
            .lock()
            .await
            .iter()
            .filter(|m| m.to() == peer_id)
            .cloned()
            .collect()
    }

    /// Poll until some recorded broadcast matches, or time out.
    pub async fn wait_for_broadcast<F>(&self, pred: F, timeout_ms: u64) -> bool
    where
        F: Fn(&SignalMessage) -> bool,
    {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.broadcasts.lock().await.iter().any(&pred) {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl RendezvousChannel for MockChannel {
    async fn track(&self, _meta: PresenceMeta) -> Result<(), ChannelError> {
        self.tracked.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn broadcast(&self, msg: SignalMessage) -> Result<(), ChannelError> {
        self.broadcasts.lock().await.push(msg);
        Ok(())
    }

    async fn unsubscribe(&self) {
        self.unsubscribed.store(true, Ordering::Relaxed);
    }
}
