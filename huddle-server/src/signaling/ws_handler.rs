use crate::registry::RoomRegistry;
use crate::relay::SignalingRelay;
use crate::signaling::SignalingService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientEvent, PeerId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Shared state behind the axum router.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub service: SignalingService,
    pub relay: Arc<SignalingRelay>,
}

impl AppState {
    pub fn new() -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let service = SignalingService::new();
        let relay = Arc::new(SignalingRelay::new(
            registry.clone(),
            Arc::new(service.clone()),
        ));
        Self {
            registry,
            service,
            relay,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    // Connection identifiers are assigned here, never chosen by the client.
    let peer_id = PeerId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, state))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, state: AppState) {
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.service.add_peer(peer_id, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = state.relay.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => relay.handle_event(peer_id, event).await,
                        Err(e) => warn!("Invalid client event from {}: {:?}", peer_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Runs on both orderly close and abort, and is idempotent: once the
    // membership is gone a second call finds no room.
    state.relay.handle_disconnect(peer_id).await;
    state.service.remove_peer(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}
