use crate::rendezvous::{ChannelError, ChannelEvent, RendezvousChannel};
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::{PeerId, PresenceEvent, PresenceMeta, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// In-process rendezvous relay: one topic per room, unbounded fan-out per
/// subscriber. Backs tests and single-process demos; a production deployment
/// implements [`RendezvousChannel`] over its own realtime infrastructure.
#[derive(Default)]
pub struct RendezvousHub {
    rooms: DashMap<RoomId, Arc<RoomTopic>>,
}

struct RoomTopic {
    subscribers: DashMap<PeerId, mpsc::UnboundedSender<ChannelEvent>>,
    present: DashMap<PeerId, PresenceMeta>,
}

impl RoomTopic {
    fn roster(&self) -> Vec<PeerId> {
        self.present.iter().map(|e| e.key().clone()).collect()
    }

    fn send_to(&self, peer_id: &PeerId, event: ChannelEvent) {
        if let Some(tx) = self.subscribers.get(peer_id) {
            let _ = tx.send(event);
        }
    }

    fn send_all(&self, event: &ChannelEvent) {
        for entry in self.subscribers.iter() {
            let _ = entry.value().send(event.clone());
        }
    }

    fn send_others(&self, sender: &PeerId, event: &ChannelEvent) {
        for entry in self.subscribers.iter() {
            if entry.key() != sender {
                let _ = entry.value().send(event.clone());
            }
        }
    }
}

impl RendezvousHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel into `room_id` for `peer_id`. The returned receiver
    /// yields everything the room broadcasts from this moment on; presence is
    /// announced separately via [`RendezvousChannel::track`].
    pub fn join(
        &self,
        room_id: &RoomId,
        peer_id: PeerId,
    ) -> (HubChannel, mpsc::UnboundedReceiver<ChannelEvent>) {
        let topic = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                info!("Opening rendezvous topic for room {:?}", room_id);
                Arc::new(RoomTopic {
                    subscribers: DashMap::new(),
                    present: DashMap::new(),
                })
            })
            .clone();

        let (tx, rx) = mpsc::unbounded_channel();
        topic.subscribers.insert(peer_id.clone(), tx);

        (HubChannel { topic, peer_id }, rx)
    }
}

/// A single participant's handle onto a hub topic.
pub struct HubChannel {
    topic: Arc<RoomTopic>,
    peer_id: PeerId,
}

#[async_trait]
impl RendezvousChannel for HubChannel {
    async fn track(&self, meta: PresenceMeta) -> Result<(), ChannelError> {
        let already_present = self.topic.roster();
        self.topic.present.insert(self.peer_id.clone(), meta.clone());

        self.topic.send_others(
            &self.peer_id,
            &ChannelEvent::Presence(PresenceEvent::Join {
                peer: self.peer_id.clone(),
                meta,
            }),
        );

        // Initial-state delivery: the newcomer observes every member that was
        // already in the room as a join of its own.
        for peer in already_present {
            let meta = self
                .topic
                .present
                .get(&peer)
                .map(|e| e.value().clone())
                .unwrap_or_default();
            self.topic.send_to(
                &self.peer_id,
                ChannelEvent::Presence(PresenceEvent::Join { peer, meta }),
            );
        }

        self.topic.send_all(&ChannelEvent::Presence(PresenceEvent::Sync {
            peers: self.topic.roster(),
        }));

        Ok(())
    }

    async fn broadcast(&self, msg: SignalMessage) -> Result<(), ChannelError> {
        debug!("Broadcast from {}: {:?}", self.peer_id, msg);
        self.topic
            .send_others(&self.peer_id, &ChannelEvent::Signal(msg));
        Ok(())
    }

    async fn unsubscribe(&self) {
        self.topic.subscribers.remove(&self.peer_id);

        if self.topic.present.remove(&self.peer_id).is_some() {
            self.topic.send_all(&ChannelEvent::Presence(PresenceEvent::Leave {
                peer: self.peer_id.clone(),
            }));
            self.topic.send_all(&ChannelEvent::Presence(PresenceEvent::Sync {
                peers: self.topic.roster(),
            }));
        }
    }
}
