//! Player Events
//!
//! Event-based communication for UI synchronization.
//! Events are emitted at key points:
//! - Play/pause transitions
//! - Track changes (explicit selection or auto-advance)
//! - Position updates (every poll while playing)
//! - Volume and preference changes

use serde::{Deserialize, Serialize};
use soundveil_core::RepeatMode;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Playing flag changed
    StateChanged { is_playing: bool },

    /// Current track changed
    TrackChanged {
        /// Playlist index of the new track
        index: usize,
        track_id: String,
        previous_track_id: Option<String>,
    },

    /// Position sample (seconds)
    PositionUpdate { position: f64, duration: f64 },

    /// Track duration became known (seconds)
    DurationKnown { duration: f64 },

    /// Volume changed (0-100)
    VolumeChanged { level: u8 },

    /// Shuffle, repeat or theme changed
    PreferencesChanged {
        shuffle_enabled: bool,
        repeat_mode: RepeatMode,
        dark_theme: bool,
    },

    /// Track finished playing naturally
    TrackFinished { track_id: String },

    /// Last track ended with repeat off; playback stopped
    EndOfPlaylist,
}
