//! Player session - core orchestration
//!
//! Ties the playlist, transport, navigation, keyboard and persistence
//! together. Every mutation ends by persisting the snapshot; identical
//! snapshots are only written once.

use crate::adapter::{AdapterSignal, AdapterState, PlayerAdapter};
use crate::error::Result;
use crate::events::PlayerEvent;
use crate::keyboard::{KeyEvent, KeyboardDispatcher, ShortcutAction};
use crate::navigation::{NavigationPolicy, TrackEndAction};
use crate::settings::PlayerSettings;
use crate::transport::{Deferred, TransportController};
use crate::view::PlayerView;
use soundveil_core::{
    PersistedSnapshot, PlaybackPreferences, Playlist, RepeatMode, Track, TransportState,
};
use soundveil_storage::{KeyValueStore, SnapshotStore};

/// One running player: playlist, transport and preferences
pub struct PlayerSession<S> {
    playlist: Playlist,
    transport: TransportController,
    preferences: PlaybackPreferences,
    navigation: NavigationPolicy,
    keyboard: KeyboardDispatcher,
    snapshots: SnapshotStore<S>,
    /// Restored position, applied on the first ready signal only
    seed_position: Option<f64>,
    /// Autoplay applies to the first load only
    autoplay_pending: bool,
    pending_events: Vec<PlayerEvent>,
}

impl<S: KeyValueStore> PlayerSession<S> {
    /// Start a session, seeding state from the stored snapshot
    ///
    /// A missing or unreadable snapshot means defaults. A stored index that
    /// no longer fits the playlist falls back to the first track, and its
    /// position is dropped with it.
    pub fn restore(
        mut playlist: Playlist,
        mut snapshots: SnapshotStore<S>,
        settings: &PlayerSettings,
    ) -> Self {
        let snapshot = snapshots.load().unwrap_or_default();

        let mut seed_position = snapshot.seek_position();
        if let Err(e) = playlist.select(snapshot.current_index) {
            tracing::debug!(error = %e, "stored track index unusable, starting from the first track");
            seed_position = 0.0;
            // Index 0 always exists in a playlist.
            let _ = playlist.select(0);
        }

        let mut transport = TransportController::new(&settings.timing);
        transport.seed(seed_position, snapshot.clamped_volume());

        let mut session = Self {
            playlist,
            transport,
            preferences: snapshot.preferences(),
            navigation: NavigationPolicy::new(),
            keyboard: KeyboardDispatcher::new(&settings.shortcuts),
            snapshots,
            seed_position: Some(seed_position),
            autoplay_pending: settings.timing.autoplay_initial,
            pending_events: Vec::new(),
        };
        session.persist();

        tracing::debug!(
            index = session.playlist.current_index(),
            position = seed_position,
            volume = session.transport.state().volume,
            "session restored"
        );
        session
    }

    /// Replace the navigation policy (e.g. with a seeded one)
    #[must_use]
    pub fn with_navigation(mut self, navigation: NavigationPolicy) -> Self {
        self.navigation = navigation;
        self
    }

    // ===== Widget =====

    /// Hand the embedded player to the session and load the current track
    pub fn attach_adapter(&mut self, adapter: Box<dyn PlayerAdapter>) {
        let track = self.playlist.current().clone();
        self.transport.install(adapter, &track);
        self.sync();
    }

    /// Apply a notification from the embedded player
    pub fn handle_signal(&mut self, signal: AdapterSignal) {
        match signal {
            AdapterSignal::Ready if !self.transport.has_adapter() => {
                // Keep the restored position and autoplay for the real widget.
                tracing::debug!("ready signal before a player was attached, ignoring");
            }
            AdapterSignal::Ready => {
                let seed = self.seed_position.take().unwrap_or(0.0);
                let autoplay = std::mem::take(&mut self.autoplay_pending);
                self.transport.on_adapter_ready(seed, autoplay);
            }
            AdapterSignal::StateChanged(AdapterState::Ended) => {
                self.transport.on_state_changed(AdapterState::Ended);
                self.on_track_ended();
            }
            AdapterSignal::StateChanged(state) => self.transport.on_state_changed(state),
        }
        self.sync();
    }

    // ===== Transport =====

    pub fn play(&mut self) {
        self.transport.play();
        self.sync();
    }

    pub fn pause(&mut self) {
        self.transport.pause();
        self.sync();
    }

    pub fn toggle_playback(&mut self) {
        self.transport.toggle_playback();
        self.sync();
    }

    pub fn seek_to(&mut self, seconds: f64) {
        self.transport.seek_to(seconds);
        self.sync();
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.transport.seek_by(delta);
        self.sync();
    }

    /// Set volume (clamped to 0-100), returning the applied level
    pub fn set_volume(&mut self, level: i32) -> u8 {
        let applied = self.transport.set_volume(level);
        self.sync();
        applied
    }

    // ===== Navigation =====

    /// Switch to the track at `index` and start it after the change delay
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        let previous_track_id = self.playlist.current().id.clone();
        let track = self.playlist.select(index)?.clone();

        // A restored position only belongs to the restored track.
        self.seed_position = None;
        self.transport.begin_track_change(&track);

        tracing::info!(index, track_id = %track.id, "track changed");
        self.emit(PlayerEvent::TrackChanged {
            index,
            track_id: track.id,
            previous_track_id: Some(previous_track_id),
        });
        self.sync();
        Ok(())
    }

    /// Skip forward. Returns false at the end of a non-repeating playlist.
    ///
    /// Repeat-one only governs natural track ends; an explicit skip always
    /// leaves the current track.
    pub fn next(&mut self) -> bool {
        let target = self.navigation.next_index(
            self.playlist.current_index(),
            self.playlist.len(),
            &self.preferences,
        );
        self.go_to(target)
    }

    /// Skip back. Returns false at the start of a non-repeating playlist.
    pub fn previous(&mut self) -> bool {
        let target = self.navigation.prev_index(
            self.playlist.current_index(),
            self.playlist.len(),
            &self.preferences,
        );
        self.go_to(target)
    }

    /// The current track finished on its own
    pub fn on_track_ended(&mut self) {
        let track_id = self.playlist.current().id.clone();
        self.emit(PlayerEvent::TrackFinished { track_id });

        let action = self.navigation.on_track_ended(
            self.playlist.current_index(),
            self.playlist.len(),
            &self.preferences,
        );
        match action {
            TrackEndAction::Replay => self.transport.replay(),
            TrackEndAction::ChangeTrack(index) => {
                self.go_to(Some(index));
            }
            TrackEndAction::Stop => {
                tracing::info!("end of playlist");
                self.emit(PlayerEvent::EndOfPlaylist);
            }
        }
        self.sync();
    }

    fn go_to(&mut self, target: Option<usize>) -> bool {
        let Some(index) = target else {
            return false;
        };
        match self.select_track(index) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(index, error = %e, "navigation target rejected");
                false
            }
        }
    }

    // ===== Preferences =====

    pub fn toggle_shuffle(&mut self) {
        self.preferences.shuffle_enabled = !self.preferences.shuffle_enabled;
        self.preferences_changed();
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.preferences.repeat_mode != mode {
            self.preferences.repeat_mode = mode;
            self.preferences_changed();
        }
    }

    /// Advance repeat through none → all → one
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.preferences.repeat_mode.cycle());
        self.preferences.repeat_mode
    }

    pub fn toggle_theme(&mut self) {
        self.preferences.dark_theme = !self.preferences.dark_theme;
        self.preferences_changed();
    }

    fn preferences_changed(&mut self) {
        let PlaybackPreferences {
            shuffle_enabled,
            repeat_mode,
            dark_theme,
        } = self.preferences;
        self.emit(PlayerEvent::PreferencesChanged {
            shuffle_enabled,
            repeat_mode,
            dark_theme,
        });
        self.sync();
    }

    // ===== Keyboard =====

    /// Route a key press. Returns the action taken, if any; the host should
    /// suppress the key's default when `action.prevents_default()`.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        let action = self.keyboard.resolve(event)?;
        match action {
            ShortcutAction::TogglePlayback => self.toggle_playback(),
            ShortcutAction::SeekBy(delta) => self.seek_by(delta),
            ShortcutAction::VolumeBy(delta) => {
                self.set_volume(i32::from(self.transport.state().volume) + delta);
            }
            ShortcutAction::ToggleMute => {
                let target = self.keyboard.mute_target(self.transport.state().volume);
                self.set_volume(i32::from(target));
            }
            ShortcutAction::Next => {
                self.next();
            }
            ShortcutAction::Previous => {
                self.previous();
            }
        }
        Some(action)
    }

    // ===== Timers =====

    pub fn is_polling(&self) -> bool {
        self.transport.is_polling()
    }

    /// One polling tick: sample the widget position
    pub fn poll(&mut self) -> Option<f64> {
        let position = self.transport.poll_position();
        self.sync();
        position
    }

    /// Delayed actions the host must schedule
    pub fn take_deferred(&mut self) -> Vec<Deferred> {
        self.transport.take_deferred()
    }

    /// Run a delayed action whose time has come
    pub fn fire_deferred(&mut self, deferred: Deferred) {
        self.transport.fire(deferred);
        self.sync();
    }

    // ===== Events & accessors =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.collect_transport_events();
        std::mem::take(&mut self.pending_events)
    }

    pub fn view(&self) -> PlayerView {
        PlayerView::build(&self.playlist, self.transport.state(), &self.preferences)
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_track(&self) -> &Track {
        self.playlist.current()
    }

    pub fn transport(&self) -> &TransportState {
        self.transport.state()
    }

    pub fn preferences(&self) -> &PlaybackPreferences {
        &self.preferences
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::capture(&self.playlist, self.transport.state(), &self.preferences)
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.collect_transport_events();
        self.pending_events.push(event);
    }

    fn collect_transport_events(&mut self) {
        self.pending_events.extend(self.transport.drain_events());
    }

    fn sync(&mut self) {
        self.collect_transport_events();
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.snapshots.save(&snapshot);
    }
}
