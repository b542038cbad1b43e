//! Player configuration
//!
//! Loaded from an optional TOML file, then overridden by `SOUNDVEIL_*`
//! environment variables (`__` separates sections, e.g.
//! `SOUNDVEIL_TIMING__POLL_INTERVAL_MS=250`).

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use soundveil_storage::{FileStore, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used under the platform data directory
const APP_DIR: &str = "soundveil";

const ENV_PREFIX: &str = "SOUNDVEIL";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_timing")]
    pub timing: TimingSettings,

    #[serde(default = "default_shortcuts")]
    pub shortcuts: ShortcutSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimingSettings {
    /// Position polling period while playing
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay between the ready signal and the first duration read
    #[serde(default = "default_duration_read_delay_ms")]
    pub duration_read_delay_ms: u64,

    /// Delay between a track change and the play command
    #[serde(default = "default_track_change_delay_ms")]
    pub track_change_delay_ms: u64,

    /// Start playing as soon as the first track is ready
    #[serde(default)]
    pub autoplay_initial: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShortcutSettings {
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,

    #[serde(default = "default_volume_step")]
    pub volume_step: u8,

    /// Level restored when un-muting from 0
    #[serde(default = "default_unmute_level")]
    pub unmute_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Snapshot directory; the platform data directory when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl PlayerSettings {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::build(path, None)
    }

    /// Same as [`PlayerSettings::load`], reading overrides from `env`
    /// instead of the process environment
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        Self::build(path, Some(env))
    }

    fn build(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timing.poll_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "timing.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        if !(self.shortcuts.seek_step_secs.is_finite() && self.shortcuts.seek_step_secs > 0.0) {
            return Err(PlaybackError::Config(format!(
                "shortcuts.seek_step_secs must be a positive number, got {}",
                self.shortcuts.seek_step_secs
            )));
        }

        if self.shortcuts.volume_step > 100 || self.shortcuts.unmute_level > 100 {
            return Err(PlaybackError::Config(
                "shortcut volume levels must be within 0-100".to_string(),
            ));
        }

        if self.storage.key.is_empty() {
            return Err(PlaybackError::Config(
                "storage.key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            timing: default_timing(),
            shortcuts: default_shortcuts(),
            storage: default_storage(),
        }
    }
}

impl TimingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn duration_read_delay(&self) -> Duration {
        Duration::from_millis(self.duration_read_delay_ms)
    }

    pub fn track_change_delay(&self) -> Duration {
        Duration::from_millis(self.track_change_delay_ms)
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        default_timing()
    }
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        default_shortcuts()
    }
}

impl StorageSettings {
    /// File store rooted at the configured or platform directory
    pub fn file_store(&self) -> Result<FileStore> {
        match &self.directory {
            Some(dir) => Ok(FileStore::new(dir)),
            None => Ok(FileStore::in_data_dir(APP_DIR)?),
        }
    }

    pub fn snapshot_store(&self) -> Result<SnapshotStore<FileStore>> {
        Ok(SnapshotStore::with_key(self.file_store()?, self.key.clone()))
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        default_storage()
    }
}

// Default values
fn default_timing() -> TimingSettings {
    TimingSettings {
        poll_interval_ms: default_poll_interval_ms(),
        duration_read_delay_ms: default_duration_read_delay_ms(),
        track_change_delay_ms: default_track_change_delay_ms(),
        autoplay_initial: false,
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_duration_read_delay_ms() -> u64 {
    500
}

fn default_track_change_delay_ms() -> u64 {
    200
}

fn default_shortcuts() -> ShortcutSettings {
    ShortcutSettings {
        seek_step_secs: default_seek_step_secs(),
        volume_step: default_volume_step(),
        unmute_level: default_unmute_level(),
    }
}

fn default_seek_step_secs() -> f64 {
    5.0
}

fn default_volume_step() -> u8 {
    10
}

fn default_unmute_level() -> u8 {
    50
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        key: default_storage_key(),
        directory: None,
    }
}

fn default_storage_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}
