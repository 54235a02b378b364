mod config;
pub mod coordinator;
pub mod engine;
mod error;
pub mod media;
pub mod rtc;
mod transport;

pub use config::NegotiationConfig;
pub use coordinator::{CoordinatorHandle, RoomSnapshot, SessionCoordinator};
pub use engine::{PeerSession, SignalingState};
pub use error::{ClientError, RtcError, TransportError};
pub use media::{MediaStream, MediaTrack, TrackId, TrackKind, TrackManager};
pub use rtc::{PeerConnection, PeerConnectionFactory, PeerConnectionState, PeerEvent};
pub use transport::SignalChannel;
