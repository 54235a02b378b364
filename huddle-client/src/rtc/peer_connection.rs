use crate::error::RtcError;
use crate::media::{MediaStream, MediaTrack, TrackId};
use async_trait::async_trait;
use huddle_core::{IceCandidateInit, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Connection state reported by the peer-connection primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Failed,
    Closed,
}

/// Everything a peer connection reports back to its owner. Delivered over a
/// channel rather than registered callbacks, so the consumer dispatches a
/// closed set of variants.
#[derive(Debug)]
pub enum PeerEvent {
    ConnectionStateChanged(PeerConnectionState),
    /// A locally gathered candidate, to be relayed to the remote peer.
    IceCandidate(IceCandidateInit),
    /// Remote media became available on this connection.
    RemoteStream(MediaStream),
}

/// The peer-connection capability the environment provides: produce and apply
/// session descriptions, queue candidates, attach and detach tracks, report
/// state. The negotiation engine never assumes more than this.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, RtcError>;
    async fn create_answer(&self) -> Result<SessionDescription, RtcError>;
    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError>;
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError>;
    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<(), RtcError>;
    async fn add_track(&self, track: Arc<dyn MediaTrack>) -> Result<(), RtcError>;
    async fn remove_track(&self, track_id: &TrackId) -> Result<(), RtcError>;
    async fn restart_ice(&self) -> Result<(), RtcError>;
    async fn close(&self);
}

/// Creates peer connections together with their event streams.
pub trait PeerConnectionFactory: Send + Sync {
    #[allow(clippy::type_complexity)]
    fn create(
        &self,
    ) -> Result<(Arc<dyn PeerConnection>, mpsc::UnboundedReceiver<PeerEvent>), RtcError>;
}
