mod peer_connection;

pub use peer_connection::{PeerConnection, PeerConnectionFactory, PeerConnectionState, PeerEvent};
