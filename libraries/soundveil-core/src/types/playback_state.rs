//! Playback state and user preference types
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Highest volume level accepted by the player
pub const MAX_VOLUME: u8 = 100;

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    One,
    All,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::One => "one",
            Self::All => "all",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "one" => Some(Self::One),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Next mode in the repeat button's cycle: none → all → one → none
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for RepeatMode {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value).ok_or_else(|| CoreError::UnknownRepeatMode(value.to_string()))
    }
}

/// Colour theme of the player surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Class name applied to the player root
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Live transport state of the embedded player
///
/// `position` and `duration` are seconds. A `duration` of zero means
/// "unknown" (not yet reported by the widget).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    /// Volume level (0-100)
    pub volume: u8,
}

impl TransportState {
    pub fn duration_known(&self) -> bool {
        self.duration > 0.0
    }

    /// Fraction of the track played, in `[0, 1]`; 0 while duration is unknown
    pub fn progress_ratio(&self) -> f64 {
        if !self.duration_known() || !self.position.is_finite() {
            return 0.0;
        }
        (self.position / self.duration).clamp(0.0, 1.0)
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: MAX_VOLUME,
        }
    }
}

/// User-facing toggles that survive restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackPreferences {
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
    pub dark_theme: bool,
}

impl PlaybackPreferences {
    pub fn theme(&self) -> Theme {
        Theme::from_dark(self.dark_theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycle_visits_all_modes() {
        let mut mode = RepeatMode::None;
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(seen, [RepeatMode::All, RepeatMode::One, RepeatMode::None]);
    }

    #[test]
    fn repeat_mode_string_forms() {
        for mode in [RepeatMode::None, RepeatMode::One, RepeatMode::All] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
            assert_eq!(mode.to_string(), mode.as_str());
        }
        assert_eq!(RepeatMode::from_str("off"), None);
        assert!(matches!(
            RepeatMode::try_from("loop"),
            Err(CoreError::UnknownRepeatMode(_))
        ));
    }

    #[test]
    fn repeat_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RepeatMode::All).unwrap(), "\"all\"");
        let mode: RepeatMode = serde_json::from_str("\"one\"").unwrap();
        assert_eq!(mode, RepeatMode::One);
    }

    #[test]
    fn transport_defaults() {
        let state = TransportState::default();
        assert!(!state.is_playing);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.volume, 100);
        assert!(!state.duration_known());
        assert_eq!(state.progress_ratio(), 0.0);
    }

    #[test]
    fn progress_ratio_is_clamped() {
        let state = TransportState {
            position: 300.0,
            duration: 200.0,
            ..TransportState::default()
        };
        assert_eq!(state.progress_ratio(), 1.0);

        let half = TransportState {
            position: 50.0,
            duration: 200.0,
            ..TransportState::default()
        };
        assert_eq!(half.progress_ratio(), 0.25);
    }

    #[test]
    fn theme_follows_dark_flag() {
        let prefs = PlaybackPreferences {
            dark_theme: true,
            ..Default::default()
        };
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.theme().class_name(), "dark");
        assert_eq!(PlaybackPreferences::default().theme().class_name(), "light");
    }
}
