use huddle_core::{
    ClientEvent, IceCandidateInit, PeerId, RoomId, ServerEvent, SessionDescription,
};

use crate::integration::{create_relay, init_tracing, join};

#[tokio::test]
async fn offer_is_forwarded_untouched_with_sender_attached() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;
    sink.clear().await;

    let sdp = SessionDescription::offer("v=0\r\no=- 0 0 IN IP4 127.0.0.1");
    relay
        .handle_event(
            alice,
            ClientEvent::Offer {
                room_id: RoomId::from("r1"),
                target_socket_id: bob,
                offer: sdp.clone(),
            },
        )
        .await;

    let bob_events = sink.events_for(&bob).await;
    match &bob_events[0] {
        ServerEvent::Offer {
            offer,
            from_socket_id,
        } => {
            assert_eq!(offer, &sdp);
            assert_eq!(*from_socket_id, alice);
        }
        other => panic!("expected offer, got {other:?}"),
    }
    // 1:1 relay, nothing reflected to the sender.
    assert!(sink.events_for(&alice).await.is_empty());
}

#[tokio::test]
async fn non_member_signaling_is_dropped() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, intruder) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    sink.clear().await;

    relay
        .handle_event(
            intruder,
            ClientEvent::Offer {
                room_id: RoomId::from("r1"),
                target_socket_id: alice,
                offer: SessionDescription::offer("v=0"),
            },
        )
        .await;
    relay
        .handle_event(
            intruder,
            ClientEvent::IceCandidate {
                room_id: RoomId::from("r1"),
                target_socket_id: alice,
                candidate: IceCandidateInit {
                    candidate: "candidate:1".into(),
                    sdp_mid: None,
                    sdp_m_line_index: None,
                },
            },
        )
        .await;

    // No observable effect for the target, no error back to the sender.
    assert_eq!(sink.delivered().await, 0);
}

#[tokio::test]
async fn evicted_sender_cannot_inject_into_old_room() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;
    // Bob moves on; his r1 membership is gone.
    join(&relay, bob, "r2", "Bob").await;
    sink.clear().await;

    relay
        .handle_event(
            bob,
            ClientEvent::Answer {
                room_id: RoomId::from("r1"),
                target_socket_id: alice,
                answer: SessionDescription::answer("v=0"),
            },
        )
        .await;

    assert!(sink.events_for(&alice).await.is_empty());
}

#[tokio::test]
async fn relay_to_vanished_target_is_a_no_op() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, ghost) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    sink.clear().await;

    // Target never joined; the sink just never delivers anywhere useful and
    // the sender sees no failure.
    relay
        .handle_event(
            alice,
            ClientEvent::IceCandidate {
                room_id: RoomId::from("r1"),
                target_socket_id: ghost,
                candidate: IceCandidateInit {
                    candidate: "candidate:1".into(),
                    sdp_mid: Some("0".into()),
                    sdp_m_line_index: Some(0),
                },
            },
        )
        .await;

    assert!(sink.events_for(&alice).await.is_empty());
    assert_eq!(sink.events_for(&ghost).await.len(), 1);
}

#[tokio::test]
async fn candidates_arrive_in_sending_order() {
    init_tracing();
    let (relay, sink) = create_relay();
    let (alice, bob) = (PeerId::new(), PeerId::new());

    join(&relay, alice, "r1", "Alice").await;
    join(&relay, bob, "r1", "Bob").await;
    sink.clear().await;

    for i in 0..5 {
        relay
            .handle_event(
                alice,
                ClientEvent::IceCandidate {
                    room_id: RoomId::from("r1"),
                    target_socket_id: bob,
                    candidate: IceCandidateInit {
                        candidate: format!("candidate:{i}"),
                        sdp_mid: None,
                        sdp_m_line_index: None,
                    },
                },
            )
            .await;
    }

    let received: Vec<String> = sink
        .events_for(&bob)
        .await
        .into_iter()
        .filter_map(|e| match e {
            ServerEvent::IceCandidate { candidate, .. } => Some(candidate.candidate),
            _ => None,
        })
        .collect();

    let expected: Vec<String> = (0..5).map(|i| format!("candidate:{i}")).collect();
    assert_eq!(received, expected);
}
