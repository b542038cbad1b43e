//! Persisted player snapshot
//!
//! The JSON shape matches the record written by the web player, so several
//! fields carry explicit renames.

use super::{PlaybackPreferences, Playlist, RepeatMode, TransportState, MAX_VOLUME};
use serde::{Deserialize, Serialize};

/// Subset of player state restored on the next start
///
/// Missing fields fall back to their defaults individually; a field with
/// the wrong type fails the whole parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub current_index: usize,

    /// Playback position in seconds
    #[serde(rename = "progress")]
    pub position: f64,

    pub volume: u8,

    pub repeat_mode: RepeatMode,

    #[serde(rename = "isShuffle")]
    pub shuffle_enabled: bool,

    #[serde(rename = "isDark", alias = "isDarkMode")]
    pub dark_theme: bool,
}

impl PersistedSnapshot {
    /// Capture the persisted subset of live state
    pub fn capture(
        playlist: &Playlist,
        transport: &TransportState,
        preferences: &PlaybackPreferences,
    ) -> Self {
        Self {
            current_index: playlist.current_index(),
            position: transport.position,
            volume: transport.volume,
            repeat_mode: preferences.repeat_mode,
            shuffle_enabled: preferences.shuffle_enabled,
            dark_theme: preferences.dark_theme,
        }
    }

    pub fn preferences(&self) -> PlaybackPreferences {
        PlaybackPreferences {
            shuffle_enabled: self.shuffle_enabled,
            repeat_mode: self.repeat_mode,
            dark_theme: self.dark_theme,
        }
    }

    /// Position usable as a seek target (negative and NaN become 0)
    pub fn seek_position(&self) -> f64 {
        if self.position.is_finite() && self.position > 0.0 {
            self.position
        } else {
            0.0
        }
    }

    pub fn clamped_volume(&self) -> u8 {
        self.volume.min(MAX_VOLUME)
    }
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            current_index: 0,
            position: 0.0,
            volume: MAX_VOLUME,
            repeat_mode: RepeatMode::None,
            shuffle_enabled: false,
            dark_theme: false,
        }
    }
}
