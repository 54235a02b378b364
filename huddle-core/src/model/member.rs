use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Identity supplied by a client when joining a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// One live connection's identity and capability flags within a room.
///
/// Capability flags always start out false; clients announce camera, mic and
/// screen activity after joining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub socket_id: PeerId,
    pub user_id: String,
    pub user_name: String,
    pub has_camera: bool,
    pub has_mic: bool,
    pub has_screen: bool,
    /// Unix timestamp in milliseconds.
    pub joined_at: u64,
}

impl Member {
    pub fn new(socket_id: PeerId, info: MemberInfo) -> Self {
        Self {
            user_id: info.user_id.unwrap_or_else(|| socket_id.to_string()),
            user_name: info.user_name.unwrap_or_else(|| "Anonymous".to_owned()),
            socket_id,
            has_camera: false,
            has_mic: false,
            has_screen: false,
            joined_at: now_millis(),
        }
    }

    pub fn apply(&mut self, patch: &CapabilityPatch) {
        if let Some(v) = patch.has_camera {
            self.has_camera = v;
        }
        if let Some(v) = patch.has_mic {
            self.has_mic = v;
        }
        if let Some(v) = patch.has_screen {
            self.has_screen = v;
        }
    }
}

/// Partial update of a member's capability flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityPatch {
    pub has_camera: Option<bool>,
    pub has_mic: Option<bool>,
    pub has_screen: Option<bool>,
}

impl CapabilityPatch {
    pub fn camera(on: bool) -> Self {
        Self {
            has_camera: Some(on),
            ..Self::default()
        }
    }

    pub fn mic(on: bool) -> Self {
        Self {
            has_mic: Some(on),
            ..Self::default()
        }
    }

    pub fn screen(on: bool) -> Self {
        Self {
            has_screen: Some(on),
            ..Self::default()
        }
    }
}

/// Current wall-clock time as unix milliseconds, the timestamp unit used on
/// the wire.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
