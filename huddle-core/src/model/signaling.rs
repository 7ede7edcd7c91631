use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
}

/// A session description as carried on the wire: `{"type": "offer", "sdp": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// A discovered ICE candidate. Field names are camelCase on the wire to match
/// the payload shape browser peers produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid", skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    pub sdp_mline_index: Option<u16>,
}

/// Signaling messages relayed over the room-scoped rendezvous channel.
///
/// The channel is broadcast, not point-to-point: every message carries
/// explicit `from`/`to` ids, and receivers must drop anything whose `to`
/// does not match their own id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum SignalMessage {
    Offer {
        offer: SessionDescription,
        to: PeerId,
        from: PeerId,
    },
    Answer {
        answer: SessionDescription,
        to: PeerId,
        from: PeerId,
    },
    IceCandidate {
        candidate: IceCandidate,
        to: PeerId,
        from: PeerId,
    },
}

impl SignalMessage {
    pub fn to(&self) -> &PeerId {
        match self {
            Self::Offer { to, .. } | Self::Answer { to, .. } | Self::IceCandidate { to, .. } => to,
        }
    }

    pub fn from(&self) -> &PeerId {
        match self {
            Self::Offer { from, .. }
            | Self::Answer { from, .. }
            | Self::IceCandidate { from, .. } => from,
        }
    }
}
