use crate::media::track::{MediaStream, MediaTrack};
use std::sync::Arc;
use tracing::debug;

/// Owns the lifecycle of the local media streams: one camera/microphone
/// stream and one screen-capture stream.
///
/// Stopping a stream stops every constituent track and clears the slot.
/// Setting a new stream replaces the previous reference without stopping it;
/// stopping first is the caller's responsibility. Stopping an empty slot is
/// a no-op.
#[derive(Default)]
pub struct TrackManager {
    local: Option<MediaStream>,
    screen: Option<MediaStream>,
}

impl TrackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_local_stream(&mut self, stream: MediaStream) {
        debug!("Local stream set: {}", stream.id());
        self.local = Some(stream);
    }

    pub fn set_screen_stream(&mut self, stream: MediaStream) {
        debug!("Screen stream set: {}", stream.id());
        self.screen = Some(stream);
    }

    pub fn stop_local_stream(&mut self) {
        if let Some(stream) = self.local.take() {
            debug!("Stopping local stream {}", stream.id());
            stream.stop_all();
        }
    }

    pub fn stop_screen_stream(&mut self) {
        if let Some(stream) = self.screen.take() {
            debug!("Stopping screen stream {}", stream.id());
            stream.stop_all();
        }
    }

    pub fn local_stream(&self) -> Option<&MediaStream> {
        self.local.as_ref()
    }

    pub fn screen_stream(&self) -> Option<&MediaStream> {
        self.screen.as_ref()
    }

    /// Every local track that should currently be offered to a remote peer:
    /// the camera/mic tracks plus any screen tracks.
    pub fn sendable_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.local
            .iter()
            .chain(self.screen.iter())
            .flat_map(|s| s.tracks().iter().cloned())
            .collect()
    }
}
