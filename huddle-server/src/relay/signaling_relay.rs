use crate::registry::RoomRegistry;
use crate::relay::ClientSink;
use huddle_core::{
    CapabilityPatch, ClientEvent, IceCandidateInit, Member, MemberInfo, PeerId, RoomId,
    ServerEvent, SessionDescription,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validates and forwards negotiation messages between members of a room.
///
/// The relay is a pure pass-through: SDP and candidate payloads are never
/// inspected or mutated. Every forwarding operation first checks that the
/// sender is a current member of the stated room; messages from stale or
/// evicted connections are dropped and logged, never forwarded.
pub struct SignalingRelay {
    registry: Arc<RoomRegistry>,
    sink: Arc<dyn ClientSink>,
}

impl SignalingRelay {
    pub fn new(registry: Arc<RoomRegistry>, sink: Arc<dyn ClientSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Dispatch one decoded client event. Failures are contained to the room
    /// or session they occurred in; nothing here returns an error upstream.
    pub async fn handle_event(&self, sender: PeerId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id, user_info } => {
                self.handle_join(sender, room_id, user_info).await;
            }
            ClientEvent::Offer {
                room_id,
                target_socket_id,
                offer,
            } => {
                self.relay_offer(sender, &room_id, target_socket_id, offer)
                    .await;
            }
            ClientEvent::Answer {
                room_id,
                target_socket_id,
                answer,
            } => {
                self.relay_answer(sender, &room_id, target_socket_id, answer)
                    .await;
            }
            ClientEvent::IceCandidate {
                room_id,
                target_socket_id,
                candidate,
            } => {
                self.relay_candidate(sender, &room_id, target_socket_id, candidate)
                    .await;
            }
            ClientEvent::ToggleCamera {
                room_id,
                has_camera,
            } => {
                let patch = CapabilityPatch::camera(has_camera);
                if self.update_member(&sender, &room_id, &patch).await.is_some() {
                    self.broadcast_from(
                        &room_id,
                        &sender,
                        ServerEvent::UserCameraToggled {
                            socket_id: sender,
                            has_camera,
                        },
                    )
                    .await;
                }
            }
            ClientEvent::ToggleMic { room_id, has_mic } => {
                let patch = CapabilityPatch::mic(has_mic);
                if self.update_member(&sender, &room_id, &patch).await.is_some() {
                    self.broadcast_from(
                        &room_id,
                        &sender,
                        ServerEvent::UserMicToggled {
                            socket_id: sender,
                            has_mic,
                        },
                    )
                    .await;
                }
            }
            ClientEvent::StartScreenShare { room_id } => {
                let patch = CapabilityPatch::screen(true);
                if let Some(member) = self.update_member(&sender, &room_id, &patch).await {
                    self.broadcast_from(
                        &room_id,
                        &sender,
                        ServerEvent::UserScreenShareStarted {
                            socket_id: sender,
                            user_name: member.user_name,
                        },
                    )
                    .await;
                }
            }
            ClientEvent::StopScreenShare { room_id } => {
                let patch = CapabilityPatch::screen(false);
                if self.update_member(&sender, &room_id, &patch).await.is_some() {
                    self.broadcast_from(
                        &room_id,
                        &sender,
                        ServerEvent::UserScreenShareStopped { socket_id: sender },
                    )
                    .await;
                }
            }
            ClientEvent::LeaveRoom { room_id } => {
                self.handle_leave(sender, &room_id).await;
            }
        }
    }

    /// Transport-level disconnect: leaves whatever room the connection was in.
    pub async fn handle_disconnect(&self, sender: PeerId) {
        if let Some(room_id) = self.registry.find_room_of(&sender) {
            self.handle_leave(sender, &room_id).await;
        }
    }

    async fn handle_join(&self, sender: PeerId, room_id: RoomId, user_info: MemberInfo) {
        // A connection belongs to at most one room; announce the departure
        // to the old room before registering in the new one.
        if let Some(previous) = self.registry.find_room_of(&sender)
            && previous != room_id
        {
            self.handle_leave(sender, &previous).await;
        }

        let users = self.registry.join(&room_id, sender, user_info);

        let Some(joined) = users.iter().find(|u| u.socket_id == sender).cloned() else {
            // Registry refused the join; only the sender hears about it.
            self.sink
                .send(
                    &sender,
                    ServerEvent::Error {
                        message: "Failed to join room".to_owned(),
                    },
                )
                .await;
            return;
        };

        info!("Peer {} joined room '{}'", sender, room_id);

        let others: Vec<Member> = users
            .iter()
            .filter(|u| u.socket_id != sender)
            .cloned()
            .collect();

        self.sink
            .send(
                &sender,
                ServerEvent::RoomJoined {
                    room_id: room_id.clone(),
                    socket_id: sender,
                    users: others,
                },
            )
            .await;

        self.broadcast_from(
            &room_id,
            &sender,
            ServerEvent::UserJoined {
                user: joined,
                users,
            },
        )
        .await;
    }

    async fn handle_leave(&self, sender: PeerId, room_id: &RoomId) {
        let Some(remaining) = self.registry.leave(room_id, &sender) else {
            // Unknown member, or the room emptied out and was deleted.
            return;
        };

        info!("Peer {} left room '{}'", sender, room_id);

        let targets: Vec<PeerId> = remaining.iter().map(|m| m.socket_id).collect();
        self.sink
            .broadcast(
                &targets,
                ServerEvent::UserLeft {
                    socket_id: sender,
                    users: remaining,
                },
            )
            .await;
    }

    async fn relay_offer(
        &self,
        sender: PeerId,
        room_id: &RoomId,
        target: PeerId,
        offer: SessionDescription,
    ) {
        if !self.check_sender(&sender, room_id, "offer") {
            return;
        }
        debug!("Relaying offer {} -> {}", sender, target);
        self.sink
            .send(
                &target,
                ServerEvent::Offer {
                    offer,
                    from_socket_id: sender,
                },
            )
            .await;
    }

    async fn relay_answer(
        &self,
        sender: PeerId,
        room_id: &RoomId,
        target: PeerId,
        answer: SessionDescription,
    ) {
        if !self.check_sender(&sender, room_id, "answer") {
            return;
        }
        debug!("Relaying answer {} -> {}", sender, target);
        self.sink
            .send(
                &target,
                ServerEvent::Answer {
                    answer,
                    from_socket_id: sender,
                },
            )
            .await;
    }

    async fn relay_candidate(
        &self,
        sender: PeerId,
        room_id: &RoomId,
        target: PeerId,
        candidate: IceCandidateInit,
    ) {
        if !self.check_sender(&sender, room_id, "ice-candidate") {
            return;
        }
        self.sink
            .send(
                &target,
                ServerEvent::IceCandidate {
                    candidate,
                    from_socket_id: sender,
                },
            )
            .await;
    }

    /// Membership gate shared by all forwarding paths.
    fn check_sender(&self, sender: &PeerId, room_id: &RoomId, what: &str) -> bool {
        if self.registry.is_member(room_id, sender) {
            return true;
        }
        warn!(
            "Dropping {} from {} who is not a member of room '{}'",
            what, sender, room_id
        );
        false
    }

    async fn update_member(
        &self,
        sender: &PeerId,
        room_id: &RoomId,
        patch: &CapabilityPatch,
    ) -> Option<Member> {
        let updated = self.registry.update_capability(room_id, sender, patch);
        if updated.is_none() {
            warn!(
                "Dropping capability update from {} who is not a member of room '{}'",
                sender, room_id
            );
        }
        updated
    }

    async fn broadcast_from(&self, room_id: &RoomId, sender: &PeerId, event: ServerEvent) {
        let targets: Vec<PeerId> = self
            .registry
            .members(room_id)
            .iter()
            .map(|m| m.socket_id)
            .filter(|id| id != sender)
            .collect();
        self.sink.broadcast(&targets, event).await;
    }
}
