//! Transport controller
//!
//! Sole owner of the transport state and of the embedded player handle.
//! Every command goes through here so local state and the widget never
//! disagree for longer than one round trip.
//!
//! Timed work (the delayed duration read and the delayed start after a track
//! change) is not run here. It is queued as [`Deferred`] actions that the
//! host fires after their delay; each action carries the load generation it
//! was created for and is discarded when a newer track has been loaded since.

use crate::adapter::{AdapterState, PlayerAdapter};
use crate::events::PlayerEvent;
use crate::settings::TimingSettings;
use soundveil_core::{Track, TransportState, MAX_VOLUME};
use std::time::Duration;

/// Kind of delayed action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    /// Read the duration once the widget has had time to learn it
    ReadDuration,
    /// Start playback after a track change
    StartPlayback,
}

/// Delayed action queued by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub kind: DeferredKind,
    /// Load generation this action belongs to
    pub load_id: u64,
    pub delay: Duration,
}

/// Start requested by a track change, waiting on readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingStart {
    None,
    /// Start timer queued, not fired yet
    Waiting,
    /// Start timer fired before the widget was ready
    Missed,
}

/// Playback transport over an embedded player
pub struct TransportController {
    state: TransportState,
    adapter: Option<Box<dyn PlayerAdapter>>,
    /// Widget reported ready for the current load
    ready: bool,
    load_id: u64,
    pending_start: PendingStart,
    deferred: Vec<Deferred>,
    pending_events: Vec<PlayerEvent>,
    duration_read_delay: Duration,
    track_change_delay: Duration,
}

impl TransportController {
    pub fn new(timing: &TimingSettings) -> Self {
        Self {
            state: TransportState::default(),
            adapter: None,
            ready: false,
            load_id: 0,
            pending_start: PendingStart::None,
            deferred: Vec::new(),
            pending_events: Vec::new(),
            duration_read_delay: timing.duration_read_delay(),
            track_change_delay: timing.track_change_delay(),
        }
    }

    // ===== State =====

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    /// Seed position and volume before any widget is attached
    pub fn seed(&mut self, position: f64, volume: u8) {
        self.state.position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        self.state.volume = volume.min(MAX_VOLUME);
    }

    pub fn has_adapter(&self) -> bool {
        self.adapter.is_some()
    }

    /// Widget present and ready for the current track
    pub fn is_attached(&self) -> bool {
        self.ready && self.adapter.is_some()
    }

    /// Position polling runs only while playing on an attached widget
    pub fn is_polling(&self) -> bool {
        self.state.is_playing && self.is_attached()
    }

    pub fn load_id(&self) -> u64 {
        self.load_id
    }

    // ===== Widget lifecycle =====

    /// Take ownership of a widget and mount `track` in it
    ///
    /// Playback running on a previous widget stops there and resumes on the
    /// new one once it reports ready.
    pub fn install(&mut self, mut adapter: Box<dyn PlayerAdapter>, track: &Track) {
        if self.state.is_playing {
            self.with_adapter("stop", |a| a.stop());
            self.set_playing(false);
            self.pending_start = PendingStart::Missed;
        } else if self.pending_start == PendingStart::Waiting {
            // The queued start belongs to the previous generation.
            self.pending_start = PendingStart::Missed;
        }
        self.load_id += 1;
        self.ready = false;

        if let Err(e) = adapter.load(track) {
            tracing::warn!(track_id = %track.id, error = %e, "failed to load track into player");
        }
        self.adapter = Some(adapter);
    }

    /// Widget finished loading the current track
    ///
    /// Pushes the volume, restores `seed_position` if positive, starts
    /// playback when `autoplay` is set (or a track-change start is owed) and
    /// queues the delayed duration read.
    pub fn on_adapter_ready(&mut self, seed_position: f64, autoplay: bool) {
        if self.adapter.is_none() {
            tracing::debug!("ready signal without a player, ignoring");
            return;
        }
        self.ready = true;

        let volume = self.state.volume;
        self.with_adapter("set_volume", |a| a.set_volume(volume));

        if seed_position > 0.0 {
            self.seek_to(seed_position);
        }

        let owed_start = self.pending_start == PendingStart::Missed;
        if owed_start {
            self.pending_start = PendingStart::None;
        }
        if autoplay || owed_start {
            self.play();
        }

        self.schedule(DeferredKind::ReadDuration, self.duration_read_delay);
    }

    /// State change reported by the widget
    pub fn on_state_changed(&mut self, state: AdapterState) {
        match state {
            AdapterState::Playing => {
                self.set_playing(true);
                self.refresh_duration();
            }
            AdapterState::Paused | AdapterState::Ended => self.set_playing(false),
            AdapterState::Unstarted | AdapterState::Buffering | AdapterState::Cued => {}
        }
    }

    /// Run a deferred action whose delay has elapsed
    pub fn fire(&mut self, deferred: Deferred) {
        if deferred.load_id != self.load_id {
            tracing::debug!(
                kind = ?deferred.kind,
                stale = deferred.load_id,
                current = self.load_id,
                "discarding stale timer"
            );
            return;
        }

        match deferred.kind {
            DeferredKind::ReadDuration => self.refresh_duration(),
            DeferredKind::StartPlayback => {
                if self.pending_start != PendingStart::Waiting {
                    tracing::debug!("track start cancelled");
                } else if self.is_attached() {
                    self.pending_start = PendingStart::None;
                    self.play();
                } else {
                    self.pending_start = PendingStart::Missed;
                }
            }
        }
    }

    /// Deferred actions queued since the last call
    pub fn take_deferred(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.deferred)
    }

    /// Switch the widget to `track` and queue a delayed start
    ///
    /// Position and duration reset to zero immediately; anything still queued
    /// for the previous track becomes stale.
    pub fn begin_track_change(&mut self, track: &Track) {
        if self.state.is_playing {
            self.with_adapter("stop", |a| a.stop());
        }
        self.set_playing(false);
        self.state.position = 0.0;
        self.state.duration = 0.0;

        self.load_id += 1;
        self.ready = false;
        self.pending_start = PendingStart::Waiting;

        if let Some(adapter) = self.adapter.as_mut() {
            if let Err(e) = adapter.load(track) {
                tracing::warn!(track_id = %track.id, error = %e, "failed to load track into player");
            }
        }

        self.schedule(DeferredKind::StartPlayback, self.track_change_delay);
    }

    // ===== Commands =====

    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }
        if !self.is_attached() {
            tracing::debug!("play ignored, player not ready");
            return;
        }
        if self.with_adapter("play", |a| a.play()) {
            self.set_playing(true);
        }
    }

    /// Pause playback and drop any start still owed to a track change or
    /// a re-attached widget
    ///
    /// Without a ready widget only the local flag changes.
    pub fn pause(&mut self) {
        self.pending_start = PendingStart::None;
        if !self.state.is_playing {
            return;
        }
        if !self.is_attached() {
            self.set_playing(false);
            return;
        }
        if self.with_adapter("pause", |a| a.pause()) {
            self.set_playing(false);
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Play the current track again after it ended, from wherever the
    /// widget sits
    pub fn replay(&mut self) {
        self.set_playing(false);
        self.play();
    }

    /// Seek to `seconds`, clamped to `[0, duration]` (or `>= 0` while the
    /// duration is unknown)
    pub fn seek_to(&mut self, seconds: f64) {
        if seconds.is_nan() {
            tracing::debug!("ignoring NaN seek target");
            return;
        }
        if !self.is_attached() {
            return;
        }

        let target = if self.state.duration_known() {
            seconds.clamp(0.0, self.state.duration)
        } else {
            seconds.max(0.0)
        };
        if !target.is_finite() {
            tracing::debug!(seconds, "ignoring unbounded seek target");
            return;
        }

        if self.with_adapter("seek", |a| a.seek(target)) {
            self.state.position = target;
            self.emit_position();
        }
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: f64) {
        self.seek_to(self.state.position + delta);
    }

    /// Set volume, clamped to 0-100. Returns the applied level.
    ///
    /// Local state always follows; the widget is only told when attached.
    pub fn set_volume(&mut self, level: i32) -> u8 {
        let level = level.clamp(0, i32::from(MAX_VOLUME)) as u8;
        if level != self.state.volume {
            self.state.volume = level;
            self.pending_events.push(PlayerEvent::VolumeChanged { level });
        }
        if self.is_attached() {
            self.with_adapter("set_volume", |a| a.set_volume(level));
        }
        level
    }

    // ===== Widget reads =====

    /// Re-read the duration, keeping only finite positive values
    pub fn refresh_duration(&mut self) {
        if !self.is_attached() {
            return;
        }
        let Some(duration) = self.adapter.as_ref().map(|a| a.duration()) else {
            return;
        };

        if !(duration.is_finite() && duration > 0.0) {
            tracing::debug!(duration, "duration not available yet");
            return;
        }

        if duration != self.state.duration {
            self.state.duration = duration;
            self.state.position = self.state.position.min(duration);
            self.pending_events.push(PlayerEvent::DurationKnown { duration });
        }
    }

    /// Sample the widget position; `None` when not polling or the sample is
    /// unusable
    pub fn poll_position(&mut self) -> Option<f64> {
        if !self.is_polling() {
            return None;
        }
        let sample = self.adapter.as_ref().map(|a| a.current_position())?;

        if !sample.is_finite() || sample < 0.0 {
            tracing::debug!(sample, "ignoring position sample");
            return None;
        }

        let position = if self.state.duration_known() {
            sample.min(self.state.duration)
        } else {
            sample
        };
        self.state.position = position;
        self.emit_position();
        Some(position)
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.state.is_playing != is_playing {
            self.state.is_playing = is_playing;
            self.pending_events
                .push(PlayerEvent::StateChanged { is_playing });
        }
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlayerEvent::PositionUpdate {
            position: self.state.position,
            duration: self.state.duration,
        });
    }

    fn schedule(&mut self, kind: DeferredKind, delay: Duration) {
        self.deferred.push(Deferred {
            kind,
            load_id: self.load_id,
            delay,
        });
    }

    /// Run a widget command, logging failures. Returns whether it was accepted.
    fn with_adapter<F>(&mut self, command: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut dyn PlayerAdapter) -> crate::Result<()>,
    {
        let Some(adapter) = self.adapter.as_deref_mut() else {
            return false;
        };
        match f(adapter) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(command, error = %e, "player command failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for TransportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportController")
            .field("state", &self.state)
            .field("has_adapter", &self.adapter.is_some())
            .field("ready", &self.ready)
            .field("load_id", &self.load_id)
            .field("pending_start", &self.pending_start)
            .finish_non_exhaustive()
    }
}
