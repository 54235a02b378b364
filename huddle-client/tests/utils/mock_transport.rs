use async_trait::async_trait;
use huddle_client::{SignalChannel, TransportError};
use huddle_core::{ClientEvent, IceCandidateInit, PeerId, ServerEvent, SessionDescription};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Signaling transport that just records what the coordinator sends.
#[derive(Clone, Default)]
pub struct MockSignalChannel {
    sent: Arc<Mutex<Vec<ClientEvent>>>,
}

impl MockSignalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ClientEvent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn offers(&self) -> Vec<(PeerId, SessionDescription)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::Offer {
                    target_socket_id,
                    offer,
                    ..
                } => Some((target_socket_id, offer)),
                _ => None,
            })
            .collect()
    }

    pub fn answers(&self) -> Vec<(PeerId, SessionDescription)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::Answer {
                    target_socket_id,
                    answer,
                    ..
                } => Some((target_socket_id, answer)),
                _ => None,
            })
            .collect()
    }

    pub fn candidates(&self) -> Vec<(PeerId, IceCandidateInit)> {
        self.sent()
            .into_iter()
            .filter_map(|e| match e {
                ClientEvent::IceCandidate {
                    target_socket_id,
                    candidate,
                    ..
                } => Some((target_socket_id, candidate)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SignalChannel for MockSignalChannel {
    async fn send(&self, event: ClientEvent) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(event);
        Ok(())
    }
}

/// Transport wired straight to other coordinators' server-event inboxes,
/// standing in for the relay: offers, answers and candidates come out the
/// other side as the matching server events. Room membership traffic is the
/// test's own business.
pub struct LoopbackChannel {
    from: PeerId,
    inboxes: HashMap<PeerId, mpsc::Sender<ServerEvent>>,
}

impl LoopbackChannel {
    pub fn new(from: PeerId, inboxes: Vec<(PeerId, mpsc::Sender<ServerEvent>)>) -> Self {
        Self {
            from,
            inboxes: inboxes.into_iter().collect(),
        }
    }

    async fn deliver(&self, target: PeerId, event: ServerEvent) -> Result<(), TransportError> {
        let inbox = self
            .inboxes
            .get(&target)
            .ok_or_else(|| TransportError(format!("no inbox for {target}")))?;
        inbox
            .send(event)
            .await
            .map_err(|_| TransportError(format!("inbox for {target} closed")))
    }
}

#[async_trait]
impl SignalChannel for LoopbackChannel {
    async fn send(&self, event: ClientEvent) -> Result<(), TransportError> {
        match event {
            ClientEvent::Offer {
                target_socket_id,
                offer,
                ..
            } => {
                self.deliver(
                    target_socket_id,
                    ServerEvent::Offer {
                        offer,
                        from_socket_id: self.from,
                    },
                )
                .await
            }
            ClientEvent::Answer {
                target_socket_id,
                answer,
                ..
            } => {
                self.deliver(
                    target_socket_id,
                    ServerEvent::Answer {
                        answer,
                        from_socket_id: self.from,
                    },
                )
                .await
            }
            ClientEvent::IceCandidate {
                target_socket_id,
                candidate,
                ..
            } => {
                self.deliver(
                    target_socket_id,
                    ServerEvent::IceCandidate {
                        candidate,
                        from_socket_id: self.from,
                    },
                )
                .await
            }
            _ => Ok(()),
        }
    }
}
