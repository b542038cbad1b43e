//! Soundveil Core
//!
//! Platform-agnostic domain types and error handling for Soundveil.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `TransportState`, `PlaybackPreferences`
//! - **Persistence Shape**: `PersistedSnapshot`, the JSON record restored at startup
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use soundveil_core::{Playlist, RepeatMode};
//!
//! let mut playlist = Playlist::builtin();
//! assert_eq!(playlist.len(), 3);
//!
//! playlist.select(2).unwrap();
//! assert_eq!(playlist.current().id, "JGwWNGJdvx8");
//!
//! assert_eq!(RepeatMode::None.cycle(), RepeatMode::All);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{
    PersistedSnapshot, PlaybackPreferences, Playlist, RepeatMode, Theme, Track, TransportState,
    MAX_VOLUME,
};
