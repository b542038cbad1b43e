//! Common test utilities and fixtures
#![allow(dead_code)]

use soundveil_core::{Playlist, Track};
use soundveil_playback::{
    AdapterSignal, AdapterState, PlaybackError, PlayerAdapter, PlayerSession, PlayerSettings,
    Result,
};
use soundveil_storage::{MemoryStore, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initialize test logging once
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Commands received by the mock widget
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Stop,
    Seek(f64),
    Volume(u8),
}

#[derive(Debug, Default)]
struct WidgetState {
    calls: Vec<Call>,
    position: f64,
    duration: f64,
    fail_commands: bool,
}

/// Mock embedded player whose state the test controls
#[derive(Debug, Clone, Default)]
pub struct MockWidget {
    inner: Arc<Mutex<WidgetState>>,
}

impl MockWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn PlayerAdapter> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn set_position(&self, position: f64) {
        self.inner.lock().unwrap().position = position;
    }

    pub fn set_duration(&self, duration: f64) {
        self.inner.lock().unwrap().duration = duration;
    }

    pub fn fail_commands(&self, fail: bool) {
        self.inner.lock().unwrap().fail_commands = fail;
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_commands {
            return Err(PlaybackError::adapter("widget unavailable"));
        }
        if let Call::Seek(seconds) = call {
            state.position = seconds;
        }
        if matches!(call, Call::Load(_)) {
            state.position = 0.0;
            state.duration = f64::NAN;
        }
        state.calls.push(call);
        Ok(())
    }
}

impl PlayerAdapter for MockWidget {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.record(Call::Load(track.id.clone()))
    }

    fn play(&mut self) -> Result<()> {
        self.record(Call::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.record(Call::Pause)
    }

    fn stop(&mut self) -> Result<()> {
        self.record(Call::Stop)
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.record(Call::Seek(seconds))
    }

    fn set_volume(&mut self, level: u8) -> Result<()> {
        self.record(Call::Volume(level))
    }

    fn current_position(&self) -> f64 {
        self.inner.lock().unwrap().position
    }

    fn duration(&self) -> f64 {
        self.inner.lock().unwrap().duration
    }
}

/// Session over the built-in playlist, optionally seeded with stored JSON
pub fn session(stored: Option<&str>) -> PlayerSession<MemoryStore> {
    init_tracing();
    let store = match stored {
        Some(raw) => MemoryStore::new().with_entry(DEFAULT_SNAPSHOT_KEY, raw),
        None => MemoryStore::new(),
    };
    PlayerSession::restore(
        Playlist::builtin(),
        SnapshotStore::new(store),
        &PlayerSettings::default(),
    )
}

/// Attach `widget`, report ready and flush the queued duration read
pub fn attach_ready(session: &mut PlayerSession<MemoryStore>, widget: &MockWidget) {
    session.attach_adapter(widget.boxed());
    session.handle_signal(AdapterSignal::Ready);
    fire_all(session);
}

/// Fire every queued deferred action immediately
pub fn fire_all(session: &mut PlayerSession<MemoryStore>) {
    loop {
        let due = session.take_deferred();
        if due.is_empty() {
            break;
        }
        for deferred in due {
            session.fire_deferred(deferred);
        }
    }
}

/// Simulate the widget reaching the end of the current track
pub fn end_track(session: &mut PlayerSession<MemoryStore>) {
    session.handle_signal(AdapterSignal::StateChanged(AdapterState::Ended));
}

pub mod fixtures {
    pub const TRACK_A: &str = "dQw4w9WgXcQ";
    pub const TRACK_B: &str = "3tmd-ClpJxA";
    pub const TRACK_C: &str = "JGwWNGJdvx8";
}
