//! Soundveil Storage
//!
//! Best-effort persistence for the player's restorable state.
//!
//! Storage never blocks or fails playback: reads that go wrong become
//! "no snapshot", and failed writes are logged and dropped.
//!
//! # Architecture
//!
//! - **`KeyValueStore`**: durable string store keyed by name (memory or files)
//! - **`SnapshotStore`**: reads and writes one `PersistedSnapshot` under a fixed key
//!
//! # Example
//!
//! ```rust
//! use soundveil_core::PersistedSnapshot;
//! use soundveil_storage::{MemoryStore, SnapshotStore};
//!
//! let mut snapshots = SnapshotStore::new(MemoryStore::new());
//! assert!(snapshots.load().is_none());
//!
//! let snapshot = PersistedSnapshot { volume: 40, ..Default::default() };
//! assert!(snapshots.save(&snapshot));
//! assert_eq!(snapshots.load(), Some(snapshot));
//! ```

mod error;
mod file;
mod snapshot;
mod store;

pub use error::{Result, StorageError};
pub use file::FileStore;
pub use snapshot::{SnapshotStore, DEFAULT_SNAPSHOT_KEY};
pub use store::{KeyValueStore, MemoryStore};
