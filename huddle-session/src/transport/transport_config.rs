/// ICE configuration for peer transports. STUN only: a pair that cannot find
/// a direct or reflexive path stays in `Negotiating` rather than falling back
/// to a relay.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![
                "stun:stun.l.google.com:19302".to_owned(),
                "stun:global.stun.twilio.com:3478".to_owned(),
            ],
        }
    }
}
