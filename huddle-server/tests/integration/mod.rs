pub mod membership_tests;
pub mod relay_tests;

use std::sync::Arc;
use tracing::Level;

use huddle_core::{ClientEvent, MemberInfo, PeerId, RoomId};
use huddle_server::{RoomRegistry, SignalingRelay};

use crate::utils::MockClientSink;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_relay() -> (Arc<SignalingRelay>, MockClientSink) {
    let registry = Arc::new(RoomRegistry::new());
    let sink = MockClientSink::new();
    let relay = Arc::new(SignalingRelay::new(registry, Arc::new(sink.clone())));
    (relay, sink)
}

pub async fn join(relay: &SignalingRelay, peer: PeerId, room: &str, name: &str) {
    relay
        .handle_event(
            peer,
            ClientEvent::JoinRoom {
                room_id: RoomId::from(room),
                user_info: MemberInfo {
                    user_id: None,
                    user_name: Some(name.to_owned()),
                },
            },
        )
        .await;
}
