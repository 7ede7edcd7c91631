use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Metadata announced alongside presence. The original clients track the
/// moment they came online; anything else is opaque to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PresenceMeta {
    pub online_at: String,
}

/// Presence signals observed on a room's rendezvous channel.
///
/// `Sync` carries the full current roster. `Join`/`Leave` are single-member
/// deltas. A newly tracking participant receives one `Join` per member
/// already present, in addition to `Sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    Sync { peers: Vec<PeerId> },
    Join { peer: PeerId, meta: PresenceMeta },
    Leave { peer: PeerId },
}
