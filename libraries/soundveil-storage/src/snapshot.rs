//! Snapshot persistence
//!
//! Reads are attempted once at startup; writes follow every state change.
//! Neither direction ever surfaces an error to the caller.

use crate::error::Result;
use crate::store::KeyValueStore;
use soundveil_core::PersistedSnapshot;

/// Storage key used by the player since its first web release
pub const DEFAULT_SNAPSHOT_KEY: &str = "ytPlayerState";

/// Best-effort reader/writer of the player snapshot
#[derive(Debug)]
pub struct SnapshotStore<S> {
    store: S,
    key: String,
    /// JSON of the last successful write, used to skip identical writes
    last_written: Option<String>,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            last_written: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the stored snapshot
    ///
    /// An absent key, a failed read and an unparsable value all yield `None`.
    pub fn load(&mut self) -> Option<PersistedSnapshot> {
        match self.try_load() {
            Ok(Some((raw, snapshot))) => {
                self.last_written = Some(raw);
                Some(snapshot)
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored snapshot");
                None
            }
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Write `snapshot`, returning whether a write actually happened
    ///
    /// Identical consecutive snapshots are written once. Failures are logged
    /// and dropped; the next change simply tries again.
    pub fn save(&mut self, snapshot: &PersistedSnapshot) -> bool {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to encode snapshot");
                return false;
            }
        };

        if self.last_written.as_deref() == Some(raw.as_str()) {
            return false;
        }

        match self.store.set(&self.key, &raw) {
            Ok(()) => {
                self.last_written = Some(raw);
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist snapshot");
                false
            }
        }
    }

    fn try_load(&self) -> Result<Option<(String, PersistedSnapshot)>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&raw)?;
        Ok(Some((raw, snapshot)))
    }
}
