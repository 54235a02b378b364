use crate::error::TransportError;
use async_trait::async_trait;
use huddle_core::ClientEvent;

/// Outbound half of the signaling transport, as seen by the client.
///
/// The transport is assumed reliable and ordered per connection; reconnection
/// and heartbeats are its own business. Incoming `ServerEvent`s arrive on the
/// mpsc receiver handed to the [`SessionCoordinator`](crate::SessionCoordinator)
/// at construction.
#[async_trait]
pub trait SignalChannel: Send + Sync {
    async fn send(&self, event: ClientEvent) -> Result<(), TransportError>;
}
