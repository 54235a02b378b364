mod track;
mod track_manager;

pub use track::{MediaStream, MediaTrack, TrackId, TrackKind};
pub use track_manager::TrackManager;
