//! Domain types for Soundveil
mod playback_state;
mod playlist;
mod snapshot;
mod track;

pub use playback_state::{PlaybackPreferences, RepeatMode, Theme, TransportState, MAX_VOLUME};
pub use playlist::Playlist;
pub use snapshot::PersistedSnapshot;
pub use track::Track;
