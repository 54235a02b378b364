use crate::registry::room::{Room, RoomInfo};
use dashmap::DashMap;
use huddle_core::{CapabilityPatch, Member, MemberInfo, PeerId, RoomId};
use tracing::{debug, info};

/// In-memory directory of rooms and their members.
///
/// The membership stored here is the single source of truth for "who is in
/// this call". Rooms exist only while they have members: removing the last
/// member deletes the room, there is no separate reaper. All operations are
/// total; unknown rooms or members yield `None`, never a panic.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Room>,
    /// Reverse index: which room a connection currently belongs to.
    membership: DashMap<PeerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the room on first join.
    ///
    /// A connection belongs to at most one room: any prior membership in a
    /// different room is removed first. Re-joining the same room replaces the
    /// member record, resetting all capability flags to their defaults.
    /// Returns the full member list after the join.
    pub fn join(&self, room_id: &RoomId, peer_id: PeerId, info: MemberInfo) -> Vec<Member> {
        if let Some(previous) = self.find_room_of(&peer_id)
            && previous != *room_id
        {
            self.leave(&previous, &peer_id);
        }

        let mut room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                info!("Creating room '{}'", room_id);
                Room::new(room_id.clone())
            });

        room.members.insert(peer_id, Member::new(peer_id, info));
        self.membership.insert(peer_id, room_id.clone());

        debug!("Peer {} joined room '{}'", peer_id, room_id);
        room.member_list()
    }

    /// Remove a connection from a room.
    ///
    /// Returns the remaining member list, or `None` if the room or member was
    /// unknown, or if the room became empty and was deleted.
    pub fn leave(&self, room_id: &RoomId, peer_id: &PeerId) -> Option<Vec<Member>> {
        let remaining = {
            let mut room = self.rooms.get_mut(room_id)?;
            room.members.remove(peer_id)?;
            self.membership.remove(peer_id);

            if room.members.is_empty() {
                None
            } else {
                Some(room.member_list())
            }
        };

        if remaining.is_none() {
            self.rooms.remove(room_id);
            info!("Room '{}' is empty, deleting", room_id);
        }

        debug!("Peer {} left room '{}'", peer_id, room_id);
        remaining
    }

    /// Patch a member's capability flags, returning the updated member.
    pub fn update_capability(
        &self,
        room_id: &RoomId,
        peer_id: &PeerId,
        patch: &CapabilityPatch,
    ) -> Option<Member> {
        let mut room = self.rooms.get_mut(room_id)?;
        let member = room.members.get_mut(peer_id)?;
        member.apply(patch);
        Some(member.clone())
    }

    pub fn find_room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.membership.get(peer_id).map(|r| r.clone())
    }

    pub fn describe(&self, room_id: &RoomId) -> Option<RoomInfo> {
        let room = self.rooms.get(room_id)?;
        Some(RoomInfo {
            room_id: room.id.clone(),
            user_count: room.members.len(),
            users: room.member_list(),
            created_at: room.created_at,
        })
    }

    pub fn is_member(&self, room_id: &RoomId, peer_id: &PeerId) -> bool {
        self.rooms
            .get(room_id)
            .map(|room| room.members.contains_key(peer_id))
            .unwrap_or(false)
    }

    /// Current member list of a room, empty if the room does not exist.
    pub fn members(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|room| room.member_list())
            .unwrap_or_default()
    }
}
