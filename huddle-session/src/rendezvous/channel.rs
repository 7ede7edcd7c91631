use async_trait::async_trait;
use huddle_core::{PresenceEvent, PresenceMeta, SignalMessage};
use thiserror::Error;

/// Everything a room session can observe on its rendezvous channel.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    Presence(PresenceEvent),
    Signal(SignalMessage),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("rendezvous channel closed")]
    Closed,
}

/// Room-scoped presence + broadcast relay the session core consumes.
///
/// Contract the engine depends on:
/// - Delivery is at-most-once and best-effort, with no ordering guarantee
///   across distinct event types. Every other subscriber in the room receives
///   every broadcast, so messages carry `to`/`from` ids and receivers filter.
/// - Presence is observable only after an explicit [`track`](Self::track).
/// - A newly tracking participant receives one `join` per member already
///   present (plus a full-roster `sync`); this is what lets both sides of a
///   pair observe each other's arrival and resolve the initiator role
///   deterministically.
///
/// Events arrive on the `mpsc` receiver handed out when the channel is
/// opened (see [`RendezvousHub::join`](crate::rendezvous::RendezvousHub::join)
/// for the in-process implementation).
#[async_trait]
pub trait RendezvousChannel: Send + Sync {
    /// Announce presence in the room. Until this is called, `join`/`leave`
    /// observers elsewhere do not see this participant.
    async fn track(&self, meta: PresenceMeta) -> Result<(), ChannelError>;

    /// Broadcast a signaling message to the room.
    async fn broadcast(&self, msg: SignalMessage) -> Result<(), ChannelError>;

    /// Withdraw presence and stop receiving events.
    async fn unsubscribe(&self);
}
