//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The embedded player rejected a command
    #[error("Player adapter error: {0}")]
    Adapter(String),

    /// Domain error (bad index, empty playlist, ...)
    #[error(transparent)]
    Core(#[from] soundveil_core::CoreError),

    /// Persistence error
    #[error(transparent)]
    Storage(#[from] soundveil_storage::StorageError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The player task has shut down
    #[error("Player task is no longer running")]
    ChannelClosed,

    /// The player task's command queue is full
    #[error("Player command queue is full")]
    QueueFull,
}

impl PlaybackError {
    pub fn adapter(reason: impl Into<String>) -> Self {
        Self::Adapter(reason.into())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
