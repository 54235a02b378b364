use crate::model::member::{Member, MemberInfo};
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Opaque session-description blob plus its type tag. The relay never looks
/// inside the SDP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// One proposed network path for the direct peer connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateInit {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
}

/// Everything a client may send to the signaling server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        #[serde(default)]
        user_info: MemberInfo,
    },
    #[serde(rename_all = "camelCase")]
    Offer {
        room_id: RoomId,
        target_socket_id: PeerId,
        offer: SessionDescription,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        room_id: RoomId,
        target_socket_id: PeerId,
        answer: SessionDescription,
    },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        room_id: RoomId,
        target_socket_id: PeerId,
        candidate: IceCandidateInit,
    },
    #[serde(rename_all = "camelCase")]
    ToggleCamera { room_id: RoomId, has_camera: bool },
    #[serde(rename_all = "camelCase")]
    ToggleMic { room_id: RoomId, has_mic: bool },
    #[serde(rename_all = "camelCase")]
    StartScreenShare { room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    StopScreenShare { room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: RoomId },
}

/// Everything the signaling server may send to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Join confirmation. `users` lists the existing members, self excluded.
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        socket_id: PeerId,
        users: Vec<Member>,
    },
    /// New member announcement to everyone already in the room. `users` is
    /// the full membership including the newcomer.
    #[serde(rename_all = "camelCase")]
    UserJoined { user: Member, users: Vec<Member> },
    /// Departure announcement. `users` is the remaining membership.
    #[serde(rename_all = "camelCase")]
    UserLeft {
        socket_id: PeerId,
        users: Vec<Member>,
    },
    #[serde(rename_all = "camelCase")]
    Offer {
        offer: SessionDescription,
        from_socket_id: PeerId,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        answer: SessionDescription,
        from_socket_id: PeerId,
    },
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        candidate: IceCandidateInit,
        from_socket_id: PeerId,
    },
    #[serde(rename_all = "camelCase")]
    UserCameraToggled { socket_id: PeerId, has_camera: bool },
    #[serde(rename_all = "camelCase")]
    UserMicToggled { socket_id: PeerId, has_mic: bool },
    #[serde(rename_all = "camelCase")]
    UserScreenShareStarted { socket_id: PeerId, user_name: String },
    #[serde(rename_all = "camelCase")]
    UserScreenShareStopped { socket_id: PeerId },
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}
