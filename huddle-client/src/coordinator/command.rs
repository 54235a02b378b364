use crate::engine::SignalingState;
use crate::media::MediaStream;
use crate::rtc::{PeerConnectionState, PeerEvent};
use huddle_core::{Member, MemberInfo, PeerId, RoomId};
use tokio::sync::oneshot;

/// Commands driving the coordinator's event loop.
#[derive(Debug)]
pub enum Command {
    JoinRoom {
        room_id: RoomId,
        info: MemberInfo,
    },
    LeaveRoom,
    SetLocalMedia {
        stream: MediaStream,
    },
    StopLocalMedia,
    StartScreenShare {
        stream: MediaStream,
    },
    StopScreenShare,
    ToggleCamera {
        on: bool,
    },
    ToggleMic {
        on: bool,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Shutdown,

    /// Event from one peer connection, forwarded by its watcher task.
    Peer {
        remote: PeerId,
        event: PeerEvent,
    },
    /// A deferred renegotiation waited long enough for `Connected`.
    RenegotiateDeadline {
        remote: PeerId,
    },
}

/// Point-in-time view of the coordinator, mainly for tests and UIs.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room_id: Option<RoomId>,
    pub local_id: Option<PeerId>,
    pub members: Vec<Member>,
    pub sessions: Vec<SessionSnapshot>,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub remote: PeerId,
    pub signaling: SignalingState,
    pub connection: PeerConnectionState,
}
