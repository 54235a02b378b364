use huddle_core::PeerId;
use thiserror::Error;

/// Failure raised by the peer-connection primitive.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RtcError(pub String);

/// Failure raised by the signaling transport.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("signaling transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("peer connection failure for {peer} during {operation}: {source}")]
    Rtc {
        peer: PeerId,
        operation: &'static str,
        #[source]
        source: RtcError,
    },

    #[error("media acquisition failed: {0}")]
    Media(String),

    #[error("not in a room")]
    NotInRoom,

    #[error("session coordinator is no longer running")]
    CoordinatorClosed,
}

impl ClientError {
    pub(crate) fn rtc(peer: PeerId, operation: &'static str, source: RtcError) -> Self {
        Self::Rtc {
            peer,
            operation,
            source,
        }
    }
}
