//! Core error types for Soundveil
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Soundveil
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A playlist needs at least one track
    #[error("Playlist must contain at least one track")]
    EmptyPlaylist,

    /// Track index outside the playlist
    #[error("Track index {index} out of bounds (playlist has {len} tracks)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Unknown repeat mode name
    #[error("Unknown repeat mode: {0}")]
    UnknownRepeatMode(String),
}
