use crate::coordinator::command::{Command, RoomSnapshot};
use crate::error::ClientError;
use crate::media::MediaStream;
use huddle_core::{MemberInfo, RoomId};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running [`SessionCoordinator`](crate::SessionCoordinator).
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    pub async fn join_room(&self, room_id: RoomId, info: MemberInfo) -> Result<(), ClientError> {
        self.send(Command::JoinRoom { room_id, info }).await
    }

    pub async fn leave_room(&self) -> Result<(), ClientError> {
        self.send(Command::LeaveRoom).await
    }

    /// Hand over an acquired camera/microphone stream. Acquisition happens at
    /// the caller; a failure there never reaches the coordinator, so there is
    /// no partial activation to roll back.
    pub async fn set_local_media(&self, stream: MediaStream) -> Result<(), ClientError> {
        self.send(Command::SetLocalMedia { stream }).await
    }

    pub async fn stop_local_media(&self) -> Result<(), ClientError> {
        self.send(Command::StopLocalMedia).await
    }

    pub async fn start_screen_share(&self, stream: MediaStream) -> Result<(), ClientError> {
        self.send(Command::StartScreenShare { stream }).await
    }

    pub async fn stop_screen_share(&self) -> Result<(), ClientError> {
        self.send(Command::StopScreenShare).await
    }

    pub async fn toggle_camera(&self, on: bool) -> Result<(), ClientError> {
        self.send(Command::ToggleCamera { on }).await
    }

    pub async fn toggle_mic(&self, on: bool) -> Result<(), ClientError> {
        self.send(Command::ToggleMic { on }).await
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| ClientError::CoordinatorClosed)
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), ClientError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ClientError::CoordinatorClosed)
    }
}
