use crate::error::ClientError;
use crate::transport::SignalChannel;
use huddle_core::{ClientEvent, IceCandidateInit, PeerId, RoomId, SessionDescription};
use std::sync::Arc;

/// Where outgoing negotiation messages go: the current room plus the
/// signaling transport. Cheap to clone per dispatch.
#[derive(Clone)]
pub struct SignalContext {
    pub room_id: RoomId,
    pub channel: Arc<dyn SignalChannel>,
}

impl SignalContext {
    pub async fn send_offer(
        &self,
        target: PeerId,
        offer: SessionDescription,
    ) -> Result<(), ClientError> {
        self.channel
            .send(ClientEvent::Offer {
                room_id: self.room_id.clone(),
                target_socket_id: target,
                offer,
            })
            .await?;
        Ok(())
    }

    pub async fn send_answer(
        &self,
        target: PeerId,
        answer: SessionDescription,
    ) -> Result<(), ClientError> {
        self.channel
            .send(ClientEvent::Answer {
                room_id: self.room_id.clone(),
                target_socket_id: target,
                answer,
            })
            .await?;
        Ok(())
    }

    pub async fn send_candidate(
        &self,
        target: PeerId,
        candidate: IceCandidateInit,
    ) -> Result<(), ClientError> {
        self.channel
            .send(ClientEvent::IceCandidate {
                room_id: self.room_id.clone(),
                target_socket_id: target,
                candidate,
            })
            .await?;
        Ok(())
    }
}
