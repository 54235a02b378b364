use crate::config::NegotiationConfig;
use crate::coordinator::command::{Command, RoomSnapshot, SessionSnapshot};
use crate::coordinator::handle::CoordinatorHandle;
use crate::engine::{PeerSession, SignalContext, SignalingState};
use crate::error::ClientError;
use crate::media::{MediaStream, TrackManager};
use crate::rtc::{PeerConnectionFactory, PeerConnectionState, PeerEvent};
use crate::transport::SignalChannel;
use huddle_core::{ClientEvent, Member, PeerId, RoomId, ServerEvent};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Orchestrates room membership and drives one [`PeerSession`] per remote
/// member.
///
/// Runs as a single event loop consuming commands from its
/// [`CoordinatorHandle`] and events from the signaling transport. Sessions
/// live in an arena keyed by the remote's connection id and are created and
/// destroyed explicitly; watcher tasks never touch them directly, they only
/// send commands back into the loop, so all transitions for one remote are
/// serialized while distinct remotes proceed independently.
pub struct SessionCoordinator {
    channel: Arc<dyn SignalChannel>,
    factory: Arc<dyn PeerConnectionFactory>,
    config: NegotiationConfig,
    tracks: TrackManager,
    sessions: HashMap<PeerId, PeerSession>,
    members: HashMap<PeerId, Member>,
    remote_streams: HashMap<PeerId, Vec<MediaStream>>,
    room_id: Option<RoomId>,
    local_id: Option<PeerId>,
    command_rx: mpsc::Receiver<Command>,
    command_tx: mpsc::Sender<Command>,
    server_rx: mpsc::Receiver<ServerEvent>,
}

impl SessionCoordinator {
    pub fn new(
        channel: Arc<dyn SignalChannel>,
        factory: Arc<dyn PeerConnectionFactory>,
        server_rx: mpsc::Receiver<ServerEvent>,
        config: NegotiationConfig,
    ) -> (Self, CoordinatorHandle) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let handle = CoordinatorHandle::new(command_tx.clone());

        let coordinator = Self {
            channel,
            factory,
            config,
            tracks: TrackManager::new(),
            sessions: HashMap::new(),
            members: HashMap::new(),
            remote_streams: HashMap::new(),
            room_id: None,
            local_id: None,
            command_rx,
            command_tx,
            server_rx,
        };

        (coordinator, handle)
    }

    pub async fn run(mut self) {
        info!("Session coordinator started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }

                evt = self.server_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_server_event(e).await,
                        None => {
                            info!("Signaling stream closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        self.teardown().await;
        info!("Session coordinator finished");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::JoinRoom { room_id, info } => {
                // Joining a new room implicitly leaves the previous one. The
                // server announces the eviction; the old sessions die here.
                if self.room_id.is_some() {
                    self.close_all_sessions().await;
                }
                self.room_id = Some(room_id.clone());
                self.notify_server(ClientEvent::JoinRoom {
                    room_id,
                    user_info: info,
                })
                .await;
            }

            Command::LeaveRoom => self.leave_room().await,

            Command::SetLocalMedia { stream } => {
                self.tracks.set_local_stream(stream);
                self.fan_out_track_change().await;
            }

            Command::StopLocalMedia => {
                self.tracks.stop_local_stream();
                self.fan_out_track_change().await;
            }

            Command::StartScreenShare { stream } => {
                self.tracks.set_screen_stream(stream);
                self.fan_out_track_change().await;
                if let Some(room_id) = self.room_id.clone() {
                    self.notify_server(ClientEvent::StartScreenShare { room_id })
                        .await;
                }
            }

            Command::StopScreenShare => {
                self.tracks.stop_screen_stream();
                self.fan_out_track_change().await;
                if let Some(room_id) = self.room_id.clone() {
                    self.notify_server(ClientEvent::StopScreenShare { room_id })
                        .await;
                }
            }

            Command::ToggleCamera { on } => {
                if let Some(room_id) = self.room_id.clone() {
                    self.notify_server(ClientEvent::ToggleCamera {
                        room_id,
                        has_camera: on,
                    })
                    .await;
                }
            }

            Command::ToggleMic { on } => {
                if let Some(room_id) = self.room_id.clone() {
                    self.notify_server(ClientEvent::ToggleMic {
                        room_id,
                        has_mic: on,
                    })
                    .await;
                }
            }

            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }

            Command::Peer { remote, event } => self.handle_peer_event(remote, event).await,

            Command::RenegotiateDeadline { remote } => {
                let Some(session) = self.sessions.get_mut(&remote) else {
                    return;
                };
                if !session.pending_renegotiation() {
                    return;
                }
                if session.connection_state() == PeerConnectionState::Connected {
                    self.try_renegotiate(remote).await;
                } else {
                    warn!(
                        "Gave up waiting for {} to connect, dropping renegotiation",
                        remote
                    );
                    session.clear_pending_renegotiation();
                }
            }

            Command::Shutdown => unreachable!("handled in run()"),
        }
    }

    async fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::RoomJoined {
                room_id,
                socket_id,
                users,
            } => {
                info!("Joined room '{}' as {}", room_id, socket_id);
                self.room_id = Some(room_id);
                self.local_id = Some(socket_id);
                self.members = users.iter().map(|u| (u.socket_id, u.clone())).collect();

                // The joining side initiates toward everyone already present;
                // existing members wait for our offer. One initiator per pair
                // keeps simultaneous offers rare.
                for member in users {
                    let remote = member.socket_id;
                    if let Err(e) = self.open_session_with_offer(remote).await {
                        warn!("Failed to initiate session with {}: {}", remote, e);
                    }
                }
            }

            ServerEvent::UserJoined { user, users } => {
                debug!("Member joined: {} ({})", user.user_name, user.socket_id);
                self.refresh_members(users);
                // The newcomer offers to us; nothing to initiate here.
            }

            ServerEvent::UserLeft { socket_id, users } => {
                debug!("Member left: {}", socket_id);
                self.refresh_members(users);
                self.destroy_session(socket_id).await;
            }

            ServerEvent::Offer {
                offer,
                from_socket_id,
            } => {
                if !self.members.contains_key(&from_socket_id) {
                    warn!("Ignoring offer from unknown peer {}", from_socket_id);
                    return;
                }
                if let Err(e) = self.handle_remote_offer(from_socket_id, offer).await {
                    warn!("Failed to process offer from {}: {}", from_socket_id, e);
                }
            }

            ServerEvent::Answer {
                answer,
                from_socket_id,
            } => {
                let Some(session) = self.sessions.get_mut(&from_socket_id) else {
                    warn!("Ignoring answer from {} with no session", from_socket_id);
                    return;
                };
                match session.apply_answer(answer).await {
                    Ok(()) => {
                        if session.state() == SignalingState::Stable
                            && session.pending_renegotiation()
                        {
                            self.try_renegotiate(from_socket_id).await;
                        }
                    }
                    Err(e) => warn!("Failed to apply answer from {}: {}", from_socket_id, e),
                }
            }

            ServerEvent::IceCandidate {
                candidate,
                from_socket_id,
            } => {
                let Some(session) = self.sessions.get_mut(&from_socket_id) else {
                    warn!(
                        "Dropping candidate from {} with no session",
                        from_socket_id
                    );
                    return;
                };
                if let Err(e) = session.add_candidate(candidate).await {
                    warn!("Failed to apply candidate from {}: {}", from_socket_id, e);
                }
            }

            ServerEvent::UserCameraToggled {
                socket_id,
                has_camera,
            } => {
                if let Some(member) = self.members.get_mut(&socket_id) {
                    member.has_camera = has_camera;
                }
            }

            ServerEvent::UserMicToggled { socket_id, has_mic } => {
                if let Some(member) = self.members.get_mut(&socket_id) {
                    member.has_mic = has_mic;
                }
            }

            ServerEvent::UserScreenShareStarted { socket_id, .. } => {
                if let Some(member) = self.members.get_mut(&socket_id) {
                    member.has_screen = true;
                }
                // The screen tracks themselves arrive through renegotiation.
            }

            ServerEvent::UserScreenShareStopped { socket_id } => {
                if let Some(member) = self.members.get_mut(&socket_id) {
                    member.has_screen = false;
                }
            }

            ServerEvent::Error { message } => {
                warn!("Signaling error from server: {}", message);
            }
        }
    }

    async fn handle_peer_event(&mut self, remote: PeerId, event: PeerEvent) {
        match event {
            PeerEvent::IceCandidate(candidate) => {
                let Some(ctx) = self.ctx() else { return };
                if let Err(e) = ctx.send_candidate(remote, candidate).await {
                    warn!("Failed to relay local candidate for {}: {}", remote, e);
                }
            }

            PeerEvent::ConnectionStateChanged(state) => {
                let Some(session) = self.sessions.get_mut(&remote) else {
                    return;
                };
                debug!("Connection with {} is now {:?}", remote, state);
                session.set_connection_state(state);

                match state {
                    PeerConnectionState::Connected => {
                        // try_renegotiate consumes the pending flag itself.
                        if session.pending_renegotiation() {
                            self.try_renegotiate(remote).await;
                        }
                    }
                    PeerConnectionState::Failed => self.handle_connection_failed(remote).await,
                    PeerConnectionState::Closed => self.destroy_session(remote).await,
                    _ => {}
                }
            }

            PeerEvent::RemoteStream(stream) => {
                debug!("Remote stream {} from {}", stream.id(), remote);
                self.remote_streams.entry(remote).or_default().push(stream);
            }
        }
    }

    /// Initial contact with an existing member: create the session, attach
    /// whatever local media is active and send the first offer.
    async fn open_session_with_offer(&mut self, remote: PeerId) -> Result<(), ClientError> {
        let ctx = self.ctx().ok_or(ClientError::NotInRoom)?;
        let desired = self.tracks.sendable_tracks();

        let session = self.ensure_session(remote)?;
        session.sync_tracks(&desired).await?;
        session.send_offer(&ctx).await
    }

    /// Offer from a remote member; the session is created on first contact.
    async fn handle_remote_offer(
        &mut self,
        remote: PeerId,
        offer: huddle_core::SessionDescription,
    ) -> Result<(), ClientError> {
        let ctx = self.ctx().ok_or(ClientError::NotInRoom)?;
        let desired = self.tracks.sendable_tracks();

        let session = self.ensure_session(remote)?;
        // Attach local media before answering so the answer describes it.
        session.sync_tracks(&desired).await?;
        session.accept_offer(&ctx, offer).await?;

        if session.state() == SignalingState::Stable && session.pending_renegotiation() {
            self.try_renegotiate(remote).await;
        }
        Ok(())
    }

    fn ensure_session(&mut self, remote: PeerId) -> Result<&mut PeerSession, ClientError> {
        let entry = match self.sessions.entry(remote) {
            Entry::Occupied(entry) => return Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry,
        };

        let local = self.local_id.ok_or(ClientError::NotInRoom)?;
        let (pc, mut events) = self
            .factory
            .create()
            .map_err(|e| ClientError::rtc(remote, "create_peer_connection", e))?;

        let tx = self.command_tx.clone();
        let event_task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if tx.send(Command::Peer { remote, event }).await.is_err() {
                    break;
                }
            }
        });

        debug!("Created session for {}", remote);
        Ok(entry.insert(PeerSession::new(local, remote, pc, event_task)))
    }

    /// A local track change fans out to every live session.
    async fn fan_out_track_change(&mut self) {
        let remotes: Vec<PeerId> = self.sessions.keys().copied().collect();
        for remote in remotes {
            self.try_renegotiate(remote).await;
        }
    }

    /// Bring one session's track set and descriptions up to date with the
    /// current local media. Sessions whose connection already failed or
    /// closed are skipped; sessions still connecting defer until `Connected`
    /// with a bounded wait.
    async fn try_renegotiate(&mut self, remote: PeerId) {
        let Some(ctx) = self.ctx() else { return };
        let desired = self.tracks.sendable_tracks();
        let Some(session) = self.sessions.get_mut(&remote) else {
            return;
        };

        match session.connection_state() {
            PeerConnectionState::Failed | PeerConnectionState::Closed => {
                debug!("Skipping renegotiation with {} (dead connection)", remote);
            }

            PeerConnectionState::Connected => {
                let changed = match session.sync_tracks(&desired).await {
                    Ok(changed) => changed,
                    Err(e) => {
                        warn!("Track sync with {} failed: {}", remote, e);
                        return;
                    }
                };
                let due = changed || session.take_pending_renegotiation();

                match session.state() {
                    SignalingState::Idle | SignalingState::Stable if due => {
                        if let Err(e) = session.send_offer(&ctx).await {
                            warn!("Renegotiation offer to {} failed: {}", remote, e);
                        }
                    }
                    SignalingState::HaveLocalOffer | SignalingState::HaveRemoteOffer if due => {
                        // An exchange is in flight; queue exactly one more.
                        session.set_pending_renegotiation();
                    }
                    _ => {}
                }
            }

            PeerConnectionState::New | PeerConnectionState::Connecting => {
                let changed = match session.sync_tracks(&desired).await {
                    Ok(changed) => changed,
                    Err(e) => {
                        warn!("Track sync with {} failed: {}", remote, e);
                        return;
                    }
                };

                if session.state() == SignalingState::Idle {
                    if let Err(e) = session.send_offer(&ctx).await {
                        warn!("Initial offer to {} failed: {}", remote, e);
                    }
                } else if changed || session.pending_renegotiation() {
                    session.set_pending_renegotiation();
                    let tx = self.command_tx.clone();
                    let wait = self.config.connect_wait;
                    session.set_deadline_task(tokio::spawn(async move {
                        tokio::time::sleep(wait).await;
                        let _ = tx.send(Command::RenegotiateDeadline { remote }).await;
                    }));
                }
            }
        }
    }

    async fn handle_connection_failed(&mut self, remote: PeerId) {
        let Some(ctx) = self.ctx() else { return };
        let Some(session) = self.sessions.get_mut(&remote) else {
            return;
        };

        match session.restart_ice(&ctx).await {
            Ok(true) => info!("ICE restart initiated for {}", remote),
            Ok(false) => {
                warn!("Connection with {} failed after restart, closing", remote);
                self.destroy_session(remote).await;
            }
            Err(e) => {
                warn!("ICE restart for {} failed: {}", remote, e);
                self.destroy_session(remote).await;
            }
        }
    }

    async fn destroy_session(&mut self, remote: PeerId) {
        if let Some(mut session) = self.sessions.remove(&remote) {
            session.close().await;
        }
        self.remote_streams.remove(&remote);
    }

    /// Destroy every live session and forget the roster. Pending
    /// renegotiations and watcher tasks for those sessions die with them.
    async fn close_all_sessions(&mut self) {
        let remotes: Vec<PeerId> = self.sessions.keys().copied().collect();
        for remote in remotes {
            self.destroy_session(remote).await;
        }
        self.members.clear();
    }

    async fn leave_room(&mut self) {
        self.close_all_sessions().await;

        self.tracks.stop_local_stream();
        self.tracks.stop_screen_stream();
        self.local_id = None;

        if let Some(room_id) = self.room_id.take() {
            info!("Leaving room '{}'", room_id);
            self.notify_server(ClientEvent::LeaveRoom { room_id }).await;
        }
    }

    async fn teardown(&mut self) {
        self.leave_room().await;
    }

    fn refresh_members(&mut self, users: Vec<Member>) {
        let local = self.local_id;
        self.members = users
            .into_iter()
            .filter(|u| Some(u.socket_id) != local)
            .map(|u| (u.socket_id, u))
            .collect();
    }

    async fn notify_server(&self, event: ClientEvent) {
        if let Err(e) = self.channel.send(event).await {
            warn!("Failed to notify signaling server: {}", e);
        }
    }

    fn ctx(&self) -> Option<SignalContext> {
        Some(SignalContext {
            room_id: self.room_id.clone()?,
            channel: self.channel.clone(),
        })
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id.clone(),
            local_id: self.local_id,
            members: self.members.values().cloned().collect(),
            sessions: self
                .sessions
                .values()
                .map(|s| SessionSnapshot {
                    remote: s.remote(),
                    signaling: s.state(),
                    connection: s.connection_state(),
                })
                .collect(),
        }
    }
}
