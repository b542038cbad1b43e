//! Embedded player adapter
//!
//! The hosted video widget is an external collaborator. Platforms wrap it
//! in a `PlayerAdapter`; the controller only ever talks to this trait.

use crate::error::Result;
use soundveil_core::Track;

/// Command surface of an embedded player
///
/// Commands are fire-and-forget from the widget's point of view; an `Err`
/// means the command could not be delivered at all. Reads may return NaN or
/// non-positive values while the widget is still loading.
pub trait PlayerAdapter: Send {
    /// Mount `track` in the widget. Readiness is reported later through
    /// `AdapterSignal::Ready`.
    fn load(&mut self, track: &Track) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// Seek to `seconds` from the start of the track
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Set output volume (0-100)
    fn set_volume(&mut self, level: u8) -> Result<()>;

    /// Current playback position in seconds
    fn current_position(&self) -> f64;

    /// Track duration in seconds (NaN or <= 0 while unknown)
    fn duration(&self) -> f64;
}

/// Playback state reported by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl AdapterState {
    /// Map an IFrame API state code (`-1, 0, 1, 2, 3, 5`)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
        }
    }
}

/// Asynchronous notifications from the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterSignal {
    /// The widget finished loading the current track and accepts commands
    Ready,
    /// The widget's playback state changed
    StateChanged(AdapterState),
}
