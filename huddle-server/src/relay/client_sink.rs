use async_trait::async_trait;
use huddle_core::{PeerId, ServerEvent};

/// Outbound half of the signaling transport.
///
/// The relay pushes events through this trait so it never touches sockets
/// directly; the WebSocket layer implements it in production and tests plug
/// in a capturing mock. Delivery to a connection that no longer exists is a
/// silent no-op, mirroring the transport's own delivery-to-nobody behavior.
#[async_trait]
pub trait ClientSink: Send + Sync {
    /// Send one event to one connection.
    async fn send(&self, peer_id: &PeerId, event: ServerEvent);

    /// Send one event to several connections.
    async fn broadcast(&self, peer_ids: &[PeerId], event: ServerEvent) {
        for peer_id in peer_ids {
            self.send(peer_id, event.clone()).await;
        }
    }
}
