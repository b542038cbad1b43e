//! Soundveil - Playback Control
//!
//! Platform-agnostic playback control for a playlist of hosted videos
//! played as audio.
//!
//! This crate provides:
//! - Transport control (play/pause, seek, volume) over an embedded player
//! - Navigation policy (next/previous with shuffle and repeat)
//! - Keyboard shortcut routing
//! - A read-only view model for the player surface
//! - Best-effort session persistence via `soundveil-storage`
//! - A tokio task that owns the polling and delayed-action timers
//!
//! # Architecture
//!
//! The embedded player is never implemented here. Platforms wrap it in a
//! [`PlayerAdapter`] and feed its notifications back as [`AdapterSignal`]s.
//! [`PlayerSession`] is fully synchronous; [`runtime::spawn`] drives it on
//! a tokio task.
//!
//! # Example: Synchronous session
//!
//! ```rust
//! use soundveil_core::Playlist;
//! use soundveil_playback::{KeyEvent, PlayerSession, PlayerSettings};
//! use soundveil_storage::{MemoryStore, SnapshotStore};
//!
//! let settings = PlayerSettings::default();
//! let mut session = PlayerSession::restore(
//!     Playlist::builtin(),
//!     SnapshotStore::new(MemoryStore::new()),
//!     &settings,
//! );
//!
//! session.cycle_repeat();
//! session.handle_key(&KeyEvent::from_dom("ArrowDown", None));
//! assert_eq!(session.view().volume, 90);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use soundveil_core::Track;
//! use soundveil_playback::{PlayerAdapter, Result};
//!
//! struct IframeBridge {
//!     // ... handle to the hosted widget
//! }
//!
//! impl PlayerAdapter for IframeBridge {
//!     fn load(&mut self, track: &Track) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//!     fn seek(&mut self, seconds: f64) -> Result<()> { Ok(()) }
//!     fn set_volume(&mut self, level: u8) -> Result<()> { Ok(()) }
//!     fn current_position(&self) -> f64 { 0.0 }
//!     fn duration(&self) -> f64 { f64::NAN }
//! }
//! ```

mod adapter;
mod error;
mod events;
mod keyboard;
mod navigation;
pub mod runtime;
mod session;
pub mod settings;
mod transport;
pub mod view;

// Public exports
pub use adapter::{AdapterSignal, AdapterState, PlayerAdapter};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use keyboard::{FocusTarget, KeyCode, KeyEvent, KeyboardDispatcher, ShortcutAction};
pub use navigation::{NavigationPolicy, TrackEndAction};
pub use runtime::{PlayerCommand, PlayerHandle, SignalSender};
pub use session::PlayerSession;
pub use settings::PlayerSettings;
pub use transport::{Deferred, DeferredKind, TransportController};
pub use view::{format_time, PlayerView, PlaylistRow};
