use huddle_core::{ClientEvent, PeerId, RoomId, ServerEvent};

use crate::integration::{create_relay, init_tracing, join};

#[tokio::test]
async fn alice_and_bob_join_and_bob_leaves() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;

    // Alice got her confirmation (nobody else there yet) plus Bob's arrival.
    let alice_events = sink.events_for(&alice).await;
    assert!(matches!(
        &alice_events[0],
        ServerEvent::RoomJoined { users, .. } if users.is_empty()
    ));
    match &alice_events[1] {
        ServerEvent::UserJoined { user, users } => {
            assert_eq!(user.socket_id, bob);
            assert_eq!(user.user_name, "Bob");
            assert_eq!(users.len(), 2);
        }
        other => panic!("expected user-joined, got {other:?}"),
    }

    // Bob's confirmation lists Alice only.
    let bob_events = sink.events_for(&bob).await;
    match &bob_events[0] {
        ServerEvent::RoomJoined {
            room_id,
            socket_id,
            users,
        } => {
            assert_eq!(room_id, &RoomId::from("r1"));
            assert_eq!(*socket_id, bob);
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].socket_id, alice);
        }
        other => panic!("expected room-joined, got {other:?}"),
    }

    relay
        .handle_event(
            bob,
            ClientEvent::LeaveRoom {
                room_id: RoomId::from("r1"),
            },
        )
        .await;

    let alice_events = sink.events_for(&alice).await;
    match alice_events.last().expect("user-left expected") {
        ServerEvent::UserLeft { socket_id, users } => {
            assert_eq!(*socket_id, bob);
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].socket_id, alice);
        }
        other => panic!("expected user-left, got {other:?}"),
    }

    // Room survives with Alice in it.
    let info = relay
        .registry()
        .describe(&RoomId::from("r1"))
        .expect("room still exists");
    assert_eq!(info.user_count, 1);
}

#[tokio::test]
async fn last_member_leaving_deletes_room_silently() {
    init_tracing();
    let (relay, sink) = create_relay();
    let alice = PeerId::new();

    join(&relay, alice, "r1", "Alice").await;
    sink.clear().await;

    relay
        .handle_event(
            alice,
            ClientEvent::LeaveRoom {
                room_id: RoomId::from("r1"),
            },
        )
        .await;

    assert!(relay.registry().describe(&RoomId::from("r1")).is_none());
    // Nobody left to notify.
    assert_eq!(sink.delivered().await, 0);
}

#[tokio::test]
async fn joining_second_room_announces_departure_to_first() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;
    sink.clear().await;

    join(&relay, bob, "r2", "Bob").await;

    let alice_events = sink.events_for(&alice).await;
    assert!(matches!(
        alice_events.first(),
        Some(ServerEvent::UserLeft { socket_id, .. }) if *socket_id == bob
    ));
    assert!(relay.registry().is_member(&RoomId::from("r2"), &bob));
    assert!(!relay.registry().is_member(&RoomId::from("r1"), &bob));
}

#[tokio::test]
async fn disconnect_behaves_like_leave() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;
    sink.clear().await;

    relay.handle_disconnect(bob).await;

    let alice_events = sink.events_for(&alice).await;
    assert!(matches!(
        alice_events.first(),
        Some(ServerEvent::UserLeft { socket_id, .. }) if *socket_id == bob
    ));

    // A second disconnect for the same peer finds nothing to do.
    sink.clear().await;
    relay.handle_disconnect(bob).await;
    assert_eq!(sink.delivered().await, 0);
}
