//! End-to-end session scenarios against a mock widget
//!
//! Each test drives the synchronous session the way a host would: attach,
//! report ready, fire deferred actions and feed widget state changes.

mod common;

use common::fixtures::{TRACK_A, TRACK_B, TRACK_C};
use common::{attach_ready, end_track, fire_all, session, Call, MockWidget};
use soundveil_core::RepeatMode;
use soundveil_playback::{
    AdapterSignal, AdapterState, KeyEvent, NavigationPolicy, PlayerEvent, ShortcutAction,
};
use soundveil_storage::{KeyValueStore, DEFAULT_SNAPSHOT_KEY};

#[test]
fn restored_position_and_volume_applied_on_ready() {
    let mut session = session(Some(r#"{"currentIndex":1,"progress":42,"volume":30}"#));
    let widget = MockWidget::new();

    session.attach_adapter(widget.boxed());
    session.handle_signal(AdapterSignal::Ready);

    assert_eq!(
        widget.calls(),
        [
            Call::Load(TRACK_B.to_string()),
            Call::Volume(30),
            Call::Seek(42.0)
        ]
    );
    assert!(!session.transport().is_playing);
}

#[test]
fn autoplay_initial_starts_first_track() {
    let store = soundveil_storage::MemoryStore::new();
    let mut settings = soundveil_playback::PlayerSettings::default();
    settings.timing.autoplay_initial = true;
    let mut session = soundveil_playback::PlayerSession::restore(
        soundveil_core::Playlist::builtin(),
        soundveil_storage::SnapshotStore::new(store),
        &settings,
    );
    let widget = MockWidget::new();

    attach_ready(&mut session, &widget);
    assert!(session.transport().is_playing);
    assert_eq!(widget.calls().last(), Some(&Call::Play));
}

#[test]
fn track_end_advances_to_next_track() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    session.play();
    widget.set_position(200.0);
    session.poll();

    end_track(&mut session);

    assert_eq!(session.current_track().id, TRACK_B);
    assert_eq!(session.transport().position, 0.0);
    assert_eq!(session.transport().duration, 0.0);
    assert!(widget.calls().contains(&Call::Load(TRACK_B.to_string())));
}

#[test]
fn last_track_end_wraps_with_repeat_all() {
    let mut session = session(Some(r#"{"currentIndex":2,"repeatMode":"all"}"#));
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);

    end_track(&mut session);

    assert_eq!(session.current_track().id, TRACK_A);
}

#[test]
fn last_track_end_without_repeat_stops() {
    let mut session = session(Some(r#"{"currentIndex":2}"#));
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    session.play();
    session.drain_events();

    end_track(&mut session);

    assert_eq!(session.current_track().id, TRACK_C);
    assert!(!session.transport().is_playing);
    let events = session.drain_events();
    assert!(events.contains(&PlayerEvent::TrackFinished {
        track_id: TRACK_C.to_string()
    }));
    assert_eq!(events.last(), Some(&PlayerEvent::EndOfPlaylist));
}

#[test]
fn repeat_one_replays_same_track_without_seeking() {
    let mut session = session(Some(r#"{"currentIndex":1,"repeatMode":"one"}"#));
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    session.play();
    widget.clear_calls();

    end_track(&mut session);

    assert_eq!(session.current_track().id, TRACK_B);
    assert!(session.transport().is_playing);
    assert_eq!(widget.calls(), [Call::Play]);
}

#[test]
fn explicit_next_leaves_track_in_repeat_one() {
    let mut session = session(Some(r#"{"repeatMode":"one"}"#));
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);

    assert!(session.next());
    assert_eq!(session.current_track().id, TRACK_B);
}

#[test]
fn track_change_plays_once_new_track_is_ready() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    session.play();

    session.select_track(2).unwrap();
    assert_eq!(session.current_track().id, TRACK_C);
    assert!(!session.transport().is_playing);

    // Start timer fires before the widget finished loading.
    fire_all(&mut session);
    assert!(!session.transport().is_playing);

    session.handle_signal(AdapterSignal::Ready);
    assert!(session.transport().is_playing);

    widget.set_duration(233.0);
    fire_all(&mut session);
    assert_eq!(session.transport().duration, 233.0);
}

#[test]
fn restored_position_not_applied_to_another_track() {
    let mut session = session(Some(r#"{"currentIndex":0,"progress":90}"#));
    let widget = MockWidget::new();
    session.attach_adapter(widget.boxed());

    session.select_track(1).unwrap();
    session.handle_signal(AdapterSignal::Ready);

    assert!(!widget.calls().iter().any(|c| matches!(c, Call::Seek(_))));
}

#[test]
fn stale_duration_read_does_not_clobber_new_track() {
    let mut session = session(None);
    let widget = MockWidget::new();
    session.attach_adapter(widget.boxed());
    session.handle_signal(AdapterSignal::Ready);
    let stale = session.take_deferred();

    session.select_track(1).unwrap();
    session.handle_signal(AdapterSignal::Ready);
    widget.set_duration(999.0);
    for deferred in stale {
        session.fire_deferred(deferred);
    }

    assert_eq!(session.transport().duration, 0.0);
}

#[test]
fn track_changed_event_names_previous_track() {
    let mut session = session(None);
    session.drain_events();

    session.select_track(2).unwrap();

    let events = session.drain_events();
    assert!(events.contains(&PlayerEvent::TrackChanged {
        index: 2,
        track_id: TRACK_C.to_string(),
        previous_track_id: Some(TRACK_A.to_string()),
    }));
}

#[test]
fn keyboard_controls_transport() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);

    let action = session.handle_key(&KeyEvent::from_dom("Space", None));
    assert_eq!(action, Some(ShortcutAction::TogglePlayback));
    assert!(action.unwrap().prevents_default());
    assert!(session.transport().is_playing);

    session.handle_key(&KeyEvent::from_dom("ArrowRight", None));
    assert_eq!(session.transport().position, 5.0);
    session.handle_key(&KeyEvent::from_dom("ArrowLeft", None));
    session.handle_key(&KeyEvent::from_dom("ArrowLeft", None));
    assert_eq!(session.transport().position, 0.0);

    session.handle_key(&KeyEvent::from_dom("ArrowUp", None));
    assert_eq!(session.transport().volume, 100);
    session.handle_key(&KeyEvent::from_dom("ArrowDown", None));
    assert_eq!(session.transport().volume, 90);

    session.handle_key(&KeyEvent::from_dom("KeyM", None));
    assert_eq!(session.transport().volume, 0);
    session.handle_key(&KeyEvent::from_dom("KeyM", None));
    assert_eq!(session.transport().volume, 50);

    session.handle_key(&KeyEvent::from_dom("KeyN", None));
    assert_eq!(session.current_track().id, TRACK_B);
    session.handle_key(&KeyEvent::from_dom("KeyP", None));
    assert_eq!(session.current_track().id, TRACK_A);
}

#[test]
fn keys_in_text_fields_do_nothing() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    widget.clear_calls();

    for code in ["Space", "KeyN", "KeyM", "ArrowUp"] {
        assert_eq!(
            session.handle_key(&KeyEvent::from_dom(code, Some("INPUT"))),
            None
        );
    }
    assert!(widget.calls().is_empty());
    assert_eq!(session.current_track().id, TRACK_A);
}

#[test]
fn widget_failures_leave_state_untouched() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    widget.fail_commands(true);

    session.play();
    session.seek_to(30.0);

    assert!(!session.transport().is_playing);
    assert_eq!(session.transport().position, 0.0);
}

#[test]
fn paused_signal_stops_polling() {
    let mut session = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut session, &widget);
    session.play();
    assert!(session.is_polling());

    session.handle_signal(AdapterSignal::StateChanged(AdapterState::Paused));
    assert!(!session.is_polling());
    widget.set_position(12.0);
    assert_eq!(session.poll(), None);
}

#[test]
fn shuffle_next_picks_within_playlist() {
    let mut session =
        session(Some(r#"{"isShuffle":true}"#)).with_navigation(NavigationPolicy::seeded(3));
    for _ in 0..20 {
        assert!(session.next());
        assert!(session.playlist().current_index() < 3);
    }
}

#[test]
fn snapshot_written_on_change_survives_new_session() {
    let mut first = session(None);
    let widget = MockWidget::new();
    attach_ready(&mut first, &widget);
    first.select_track(2).unwrap();
    first.set_volume(35);
    first.set_repeat(RepeatMode::All);
    first.toggle_shuffle();
    first.toggle_theme();

    let stored = first
        .snapshots()
        .store()
        .get(DEFAULT_SNAPSHOT_KEY)
        .unwrap()
        .unwrap();
    let second = session(Some(stored.as_str()));

    assert_eq!(second.playlist().current_index(), 2);
    assert_eq!(second.transport().volume, 35);
    assert_eq!(second.preferences().repeat_mode, RepeatMode::All);
    assert!(second.preferences().shuffle_enabled);
    assert!(second.preferences().dark_theme);
}

#[test]
fn malformed_snapshot_starts_with_defaults() {
    let session = session(Some("{\"currentIndex\": \"two\""));
    let view = session.view();

    assert_eq!(view.current_index, 0);
    assert_eq!(view.volume, 100);
    assert_eq!(view.position, 0.0);
    assert!(!view.shuffle_enabled);
    assert_eq!(view.repeat_mode, RepeatMode::None);
    assert!(!view.theme.is_dark());
}

#[test]
fn reattached_widget_resumes_playback_on_ready() {
    let mut session = session(None);
    let first = MockWidget::new();
    attach_ready(&mut session, &first);
    session.play();

    let second = MockWidget::new();
    session.attach_adapter(second.boxed());
    assert!(!session.transport().is_playing);
    assert!(!session.is_polling());
    assert_eq!(first.calls().last(), Some(&Call::Stop));

    session.handle_signal(AdapterSignal::Ready);
    assert!(session.transport().is_playing);
    assert!(session.is_polling());
    assert_eq!(second.calls().last(), Some(&Call::Play));
}

#[test]
fn pause_before_reattached_widget_is_ready_stays_paused() {
    let mut session = session(None);
    let first = MockWidget::new();
    attach_ready(&mut session, &first);
    session.play();

    let second = MockWidget::new();
    session.attach_adapter(second.boxed());
    session.pause();
    assert!(!session.transport().is_playing);

    session.handle_signal(AdapterSignal::Ready);
    fire_all(&mut session);
    assert!(!session.transport().is_playing);
    assert!(!second.calls().contains(&Call::Play));
}

#[test]
fn ready_before_attach_keeps_restored_position() {
    let mut session = session(Some(r#"{"progress":42}"#));
    let widget = MockWidget::new();

    session.handle_signal(AdapterSignal::Ready);
    session.attach_adapter(widget.boxed());
    session.handle_signal(AdapterSignal::Ready);

    assert!(widget.calls().contains(&Call::Seek(42.0)));
}

#[test]
fn ready_before_attach_keeps_initial_autoplay() {
    let mut settings = soundveil_playback::PlayerSettings::default();
    settings.timing.autoplay_initial = true;
    let mut session = soundveil_playback::PlayerSession::restore(
        soundveil_core::Playlist::builtin(),
        soundveil_storage::SnapshotStore::new(soundveil_storage::MemoryStore::new()),
        &settings,
    );
    let widget = MockWidget::new();

    session.handle_signal(AdapterSignal::Ready);
    attach_ready(&mut session, &widget);

    assert!(session.transport().is_playing);
    assert_eq!(widget.calls().last(), Some(&Call::Play));
}
