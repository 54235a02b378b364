use crate::engine::SignalContext;
use crate::error::ClientError;
use crate::media::{MediaTrack, TrackId};
use crate::rtc::{PeerConnection, PeerConnectionState};
use huddle_core::{IceCandidateInit, PeerId, SessionDescription};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Offer/answer progress for one remote peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    /// No description applied yet.
    Idle,
    /// Our offer is out, awaiting the remote answer.
    HaveLocalOffer,
    /// A remote offer was applied, our answer not yet produced.
    HaveRemoteOffer,
    /// Both descriptions applied; media may flow.
    Stable,
    /// Torn down; never negotiates again.
    Closed,
}

/// Negotiation state machine for a single remote peer.
///
/// Owned exclusively by the coordinator that created it, which serializes all
/// calls for the same remote. Candidates that arrive before a remote
/// description exists are queued and flushed, in arrival order, the moment
/// one is applied.
pub struct PeerSession {
    local: PeerId,
    remote: PeerId,
    pc: Arc<dyn PeerConnection>,
    state: SignalingState,
    conn_state: PeerConnectionState,
    pending_candidates: VecDeque<IceCandidateInit>,
    has_remote_description: bool,
    ice_restarted: bool,
    pending_renegotiation: bool,
    attached: HashMap<TrackId, Arc<dyn MediaTrack>>,
    event_task: JoinHandle<()>,
    deadline_task: Option<JoinHandle<()>>,
}

impl PeerSession {
    pub fn new(
        local: PeerId,
        remote: PeerId,
        pc: Arc<dyn PeerConnection>,
        event_task: JoinHandle<()>,
    ) -> Self {
        Self {
            local,
            remote,
            pc,
            state: SignalingState::Idle,
            conn_state: PeerConnectionState::New,
            pending_candidates: VecDeque::new(),
            has_remote_description: false,
            ice_restarted: false,
            pending_renegotiation: false,
            attached: HashMap::new(),
            event_task,
            deadline_task: None,
        }
    }

    pub fn remote(&self) -> PeerId {
        self.remote
    }

    pub fn state(&self) -> SignalingState {
        self.state
    }

    pub fn connection_state(&self) -> PeerConnectionState {
        self.conn_state
    }

    pub fn set_connection_state(&mut self, state: PeerConnectionState) {
        self.conn_state = state;
    }

    pub fn pending_renegotiation(&self) -> bool {
        self.pending_renegotiation
    }

    pub fn set_pending_renegotiation(&mut self) {
        self.pending_renegotiation = true;
    }

    pub fn take_pending_renegotiation(&mut self) -> bool {
        std::mem::take(&mut self.pending_renegotiation)
    }

    pub fn clear_pending_renegotiation(&mut self) {
        self.pending_renegotiation = false;
    }

    pub fn set_deadline_task(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.deadline_task.replace(task) {
            previous.abort();
        }
    }

    /// Produce an offer, apply it locally and send it to the remote peer.
    /// Valid from `Idle` (initial contact) and `Stable` (renegotiation).
    pub async fn send_offer(&mut self, ctx: &SignalContext) -> Result<(), ClientError> {
        let offer = self.rtc_op("create_offer", self.pc.create_offer().await)?;
        self.rtc_op(
            "set_local_description",
            self.pc.set_local_description(offer.clone()).await,
        )?;
        self.state = SignalingState::HaveLocalOffer;
        debug!("Sent offer to {}", self.remote);
        ctx.send_offer(self.remote, offer).await
    }

    /// Apply a remote offer and answer it.
    ///
    /// If our own offer is still outstanding (glare), the peer with the
    /// lexicographically smaller connection id yields: it abandons its offer,
    /// answers the remote one and re-issues its renegotiation once stable.
    /// The larger peer ignores the colliding offer and keeps waiting for its
    /// answer.
    pub async fn accept_offer(
        &mut self,
        ctx: &SignalContext,
        offer: SessionDescription,
    ) -> Result<(), ClientError> {
        match self.state {
            SignalingState::Closed => return Ok(()),
            SignalingState::HaveLocalOffer => {
                if self.local < self.remote {
                    debug!("Offer glare with {}: yielding", self.remote);
                    self.pending_renegotiation = true;
                } else {
                    debug!("Offer glare with {}: holding our offer", self.remote);
                    return Ok(());
                }
            }
            _ => {}
        }

        self.rtc_op(
            "set_remote_description",
            self.pc.set_remote_description(offer).await,
        )?;
        self.state = SignalingState::HaveRemoteOffer;
        self.has_remote_description = true;
        self.flush_candidates().await;

        let answer = self.rtc_op("create_answer", self.pc.create_answer().await)?;
        self.rtc_op(
            "set_local_description",
            self.pc.set_local_description(answer.clone()).await,
        )?;
        self.state = SignalingState::Stable;
        debug!("Answered offer from {}", self.remote);
        ctx.send_answer(self.remote, answer).await
    }

    /// Apply the remote answer to our outstanding offer. Answers arriving in
    /// any other state are ignored.
    pub async fn apply_answer(&mut self, answer: SessionDescription) -> Result<(), ClientError> {
        if self.state != SignalingState::HaveLocalOffer {
            warn!(
                "Ignoring answer from {} in state {:?}",
                self.remote, self.state
            );
            return Ok(());
        }

        self.rtc_op(
            "set_remote_description",
            self.pc.set_remote_description(answer).await,
        )?;
        self.has_remote_description = true;
        self.flush_candidates().await;
        self.state = SignalingState::Stable;
        debug!("Session with {} is stable", self.remote);
        Ok(())
    }

    /// Apply a remote candidate, or queue it while no remote description is
    /// set. Queued candidates are never dropped.
    pub async fn add_candidate(&mut self, candidate: IceCandidateInit) -> Result<(), ClientError> {
        if !self.has_remote_description {
            debug!(
                "Queueing early candidate from {} ({} queued)",
                self.remote,
                self.pending_candidates.len() + 1
            );
            self.pending_candidates.push_back(candidate);
            return Ok(());
        }

        self.rtc_op(
            "add_ice_candidate",
            self.pc.add_ice_candidate(candidate).await,
        )
    }

    /// Drain the early-candidate queue, applying each exactly once in arrival
    /// order. A candidate the connection rejects is logged and skipped; it
    /// does not block the ones behind it.
    async fn flush_candidates(&mut self) {
        while let Some(candidate) = self.pending_candidates.pop_front() {
            if let Err(e) = self.pc.add_ice_candidate(candidate).await {
                warn!("Failed to apply queued candidate from {}: {}", self.remote, e);
            }
        }
    }

    /// Reconcile the attached track set with what the track manager wants to
    /// send. Returns whether anything changed, i.e. whether renegotiation is
    /// needed.
    pub async fn sync_tracks(
        &mut self,
        desired: &[Arc<dyn MediaTrack>],
    ) -> Result<bool, ClientError> {
        let mut changed = false;

        let removals: Vec<TrackId> = self
            .attached
            .keys()
            .filter(|id| !desired.iter().any(|t| t.id() == **id))
            .cloned()
            .collect();
        for id in removals {
            self.rtc_op("remove_track", self.pc.remove_track(&id).await)?;
            self.attached.remove(&id);
            changed = true;
        }

        for track in desired {
            let id = track.id();
            if self.attached.contains_key(&id) {
                continue;
            }
            self.rtc_op("add_track", self.pc.add_track(track.clone()).await)?;
            self.attached.insert(id, track.clone());
            changed = true;
        }

        Ok(changed)
    }

    /// One ICE restart is attempted after the connection reports `Failed`.
    /// Returns false when the restart budget is spent and the session should
    /// be torn down instead.
    pub async fn restart_ice(&mut self, ctx: &SignalContext) -> Result<bool, ClientError> {
        if self.ice_restarted {
            return Ok(false);
        }
        self.ice_restarted = true;

        debug!("Attempting ICE restart for {}", self.remote);
        self.rtc_op("restart_ice", self.pc.restart_ice().await)?;
        self.send_offer(ctx).await?;
        Ok(true)
    }

    /// Tear the session down: stop its background tasks and close the
    /// underlying connection. Pending renegotiations die with it.
    pub async fn close(&mut self) {
        self.event_task.abort();
        if let Some(task) = self.deadline_task.take() {
            task.abort();
        }
        self.pending_renegotiation = false;
        self.pending_candidates.clear();
        self.state = SignalingState::Closed;
        self.pc.close().await;
        debug!("Session with {} closed", self.remote);
    }

    fn rtc_op<T>(
        &self,
        operation: &'static str,
        result: Result<T, crate::error::RtcError>,
    ) -> Result<T, ClientError> {
        result.map_err(|e| ClientError::rtc(self.remote, operation, e))
    }
}
