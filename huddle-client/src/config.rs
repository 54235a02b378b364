use std::time::Duration;

/// Tunables for the negotiation engine.
#[derive(Clone, Debug)]
pub struct NegotiationConfig {
    /// How long a deferred renegotiation waits for the peer connection to
    /// reach `Connected` before it is abandoned.
    pub connect_wait: Duration,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            connect_wait: Duration::from_secs(10),
        }
    }
}
