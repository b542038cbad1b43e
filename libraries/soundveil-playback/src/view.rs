//! Read-only presentation model
//!
//! Everything a UI needs to draw the player, computed from session state.

use serde::Serialize;
use soundveil_core::{PlaybackPreferences, Playlist, RepeatMode, Theme, TransportState};

/// One playlist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistRow {
    pub index: usize,
    pub track_id: String,
    pub title: String,
    /// Row of the current track
    pub active: bool,
}

/// Snapshot of everything the player surface displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rows: Vec<PlaylistRow>,
    pub current_index: usize,
    pub now_playing: String,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    /// `MM:SS` of the position
    pub elapsed_label: String,
    /// `MM:SS` of the duration
    pub duration_label: String,
    /// Scrubber fill in `[0, 1]`
    pub progress: f64,
    pub volume: u8,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
    pub repeat_label: &'static str,
    pub theme: Theme,
}

impl PlayerView {
    pub fn build(
        playlist: &Playlist,
        transport: &TransportState,
        preferences: &PlaybackPreferences,
    ) -> Self {
        let current_index = playlist.current_index();
        let rows = playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| PlaylistRow {
                index,
                track_id: track.id.clone(),
                title: track.title.clone(),
                active: index == current_index,
            })
            .collect();

        Self {
            rows,
            current_index,
            now_playing: playlist.current().title.clone(),
            is_playing: transport.is_playing,
            position: transport.position,
            duration: transport.duration,
            elapsed_label: format_time(transport.position),
            duration_label: format_time(transport.duration),
            progress: transport.progress_ratio(),
            volume: transport.volume,
            shuffle_enabled: preferences.shuffle_enabled,
            repeat_mode: preferences.repeat_mode,
            repeat_label: repeat_label(preferences.repeat_mode),
            theme: preferences.theme(),
        }
    }
}

impl Default for PlayerView {
    fn default() -> Self {
        Self::build(
            &Playlist::builtin(),
            &TransportState::default(),
            &PlaybackPreferences::default(),
        )
    }
}

/// Format seconds as zero-padded `MM:SS`; NaN and negatives show `00:00`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Label of the repeat button
pub fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::None => "Repeat off",
        RepeatMode::One => "Repeat one",
        RepeatMode::All => "Repeat all",
    }
}
