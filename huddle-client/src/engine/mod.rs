mod peer_session;
mod signal_context;

pub use peer_session::{PeerSession, SignalingState};
pub use signal_context::SignalContext;
