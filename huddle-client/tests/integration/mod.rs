
use std::sync::Arc;
use tracing::Level;

use huddle_client::{
    CoordinatorHandle, NegotiationConfig, RoomSnapshot, SessionCoordinator, SignalingState,
};
use huddle_core::{Member, MemberInfo, PeerId, RoomId, ServerEvent};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::utils::{MockFactory, MockSignalChannel};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Deterministic ids so glare tie-breaks are predictable in tests.
pub fn peer_id(n: u128) -> PeerId {
    PeerId(Uuid::from_u128(n))
}

pub fn member(id: PeerId, name: &str) -> Member {
    Member::new(
        id,
        MemberInfo {
            user_id: None,
            user_name: Some(name.to_owned()),
        },
    )
}

pub fn room() -> RoomId {
    RoomId::from("test-room")
}

/// Let the spawned coordinator and its watcher tasks drain their queues.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

/// A coordinator running against mock transport and mock peer connections.
pub struct Harness {
    pub handle: CoordinatorHandle,
    pub server_tx: mpsc::Sender<ServerEvent>,
    pub channel: MockSignalChannel,
    pub factory: MockFactory,
}

impl Harness {
    pub async fn server(&self, event: ServerEvent) {
        self.server_tx.send(event).await.expect("coordinator alive");
        settle().await;
    }

    pub async fn snapshot(&self) -> RoomSnapshot {
        self.handle.snapshot().await.expect("coordinator alive")
    }
}

pub fn spawn_coordinator(config: NegotiationConfig) -> Harness {
    let channel = MockSignalChannel::new();
    let factory = MockFactory::new();
    let (server_tx, server_rx) = mpsc::channel(64);

    let (coordinator, handle) = SessionCoordinator::new(
        Arc::new(channel.clone()),
        Arc::new(factory.clone()),
        server_rx,
        config,
    );
    tokio::spawn(coordinator.run());

    Harness {
        handle,
        server_tx,
        channel,
        factory,
    }
}

/// Join the test room and process the server's confirmation listing `others`.
pub async fn join(harness: &Harness, local: PeerId, others: Vec<Member>) {
    harness
        .handle
        .join_room(room(), MemberInfo::default())
        .await
        .expect("join");
    harness
        .server(ServerEvent::RoomJoined {
            room_id: room(),
            socket_id: local,
            users: others,
        })
        .await;
}

pub fn session_state(snapshot: &RoomSnapshot, remote: PeerId) -> Option<SignalingState> {
    snapshot
        .sessions
        .iter()
        .find(|s| s.remote == remote)
        .map(|s| s.signaling)
}
