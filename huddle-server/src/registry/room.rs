use huddle_core::{Member, PeerId, RoomId};
use serde::Serialize;
use std::collections::HashMap;

/// One named room and its live members.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub members: HashMap<PeerId, Member>,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashMap::new(),
            created_at: huddle_core::now_millis(),
        }
    }

    /// Membership snapshot in join order (joined_at, then peer id for ties).
    pub fn member_list(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.members.values().cloned().collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.socket_id.cmp(&b.socket_id))
        });
        members
    }
}

/// Read-only snapshot of a room, served over REST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub user_count: usize,
    pub users: Vec<Member>,
    pub created_at: u64,
}
