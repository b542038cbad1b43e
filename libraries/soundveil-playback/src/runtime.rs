//! Async player driver
//!
//! Runs a [`PlayerSession`] on a tokio task. Commands (including widget
//! signals) arrive over an mpsc channel, events leave over a broadcast
//! channel and the latest [`PlayerView`] is published on a watch channel.
//!
//! The task owns every timer: the position poller ticks only while the
//! session reports it is polling, and deferred actions run as sleeping
//! tasks in a `JoinSet` that is aborted when the player shuts down.

use crate::adapter::{AdapterSignal, AdapterState, PlayerAdapter};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::keyboard::{KeyEvent, ShortcutAction};
use crate::session::PlayerSession;
use crate::settings::TimingSettings;
use crate::transport::Deferred;
use crate::view::PlayerView;
use soundveil_core::RepeatMode;
use soundveil_storage::KeyValueStore;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Commands accepted by the player task
pub enum PlayerCommand {
    Play,
    Pause,
    TogglePlayback,
    Seek(f64),
    SeekBy(f64),
    SetVolume(i32),
    Next,
    Previous,
    Select {
        index: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    ToggleShuffle,
    SetRepeat(RepeatMode),
    CycleRepeat,
    ToggleTheme,
    Key {
        event: KeyEvent,
        reply: Option<oneshot::Sender<Option<ShortcutAction>>>,
    },
    Signal(AdapterSignal),
    Attach(Box<dyn PlayerAdapter>),
    Shutdown,
}

impl std::fmt::Debug for PlayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play => f.write_str("Play"),
            Self::Pause => f.write_str("Pause"),
            Self::TogglePlayback => f.write_str("TogglePlayback"),
            Self::Seek(s) => f.debug_tuple("Seek").field(s).finish(),
            Self::SeekBy(d) => f.debug_tuple("SeekBy").field(d).finish(),
            Self::SetVolume(v) => f.debug_tuple("SetVolume").field(v).finish(),
            Self::Next => f.write_str("Next"),
            Self::Previous => f.write_str("Previous"),
            Self::Select { index, .. } => f.debug_struct("Select").field("index", index).finish(),
            Self::ToggleShuffle => f.write_str("ToggleShuffle"),
            Self::SetRepeat(m) => f.debug_tuple("SetRepeat").field(m).finish(),
            Self::CycleRepeat => f.write_str("CycleRepeat"),
            Self::ToggleTheme => f.write_str("ToggleTheme"),
            Self::Key { event, .. } => f.debug_struct("Key").field("event", event).finish(),
            Self::Signal(s) => f.debug_tuple("Signal").field(s).finish(),
            Self::Attach(_) => f.write_str("Attach"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable sender for widget notifications
///
/// Adapter implementations keep one of these to report readiness and state
/// changes back to the player.
#[derive(Debug, Clone)]
pub struct SignalSender {
    commands: mpsc::Sender<PlayerCommand>,
}

impl SignalSender {
    pub async fn send(&self, signal: AdapterSignal) -> Result<()> {
        self.commands
            .send(PlayerCommand::Signal(signal))
            .await
            .map_err(|_| PlaybackError::ChannelClosed)
    }

    /// Non-blocking send, for synchronous widget callbacks
    ///
    /// Fails with [`PlaybackError::QueueFull`] when the task is behind; the
    /// signal is dropped and the caller may retry.
    pub fn try_send(&self, signal: AdapterSignal) -> Result<()> {
        self.commands
            .try_send(PlayerCommand::Signal(signal))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PlaybackError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => PlaybackError::ChannelClosed,
            })
    }

    pub async fn ready(&self) -> Result<()> {
        self.send(AdapterSignal::Ready).await
    }

    pub async fn state_changed(&self, state: AdapterState) -> Result<()> {
        self.send(AdapterSignal::StateChanged(state)).await
    }
}

/// Handle to a running player task
#[derive(Debug)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    events: broadcast::Sender<PlayerEvent>,
    view: watch::Receiver<PlayerView>,
    task: JoinHandle<()>,
}

/// Move `session` onto a new tokio task
pub fn spawn<S>(session: PlayerSession<S>, timing: &TimingSettings) -> PlayerHandle
where
    S: KeyValueStore + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
    let (view_tx, view_rx) = watch::channel(session.view());

    let task = tokio::spawn(run(
        session,
        command_rx,
        event_tx.clone(),
        view_tx,
        timing.poll_interval(),
    ));

    PlayerHandle {
        commands: command_tx,
        events: event_tx,
        view: view_rx,
        task,
    }
}

impl PlayerHandle {
    pub async fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::ChannelClosed)
    }

    pub async fn attach(&self, adapter: Box<dyn PlayerAdapter>) -> Result<()> {
        self.send(PlayerCommand::Attach(adapter)).await
    }

    pub async fn play(&self) -> Result<()> {
        self.send(PlayerCommand::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(PlayerCommand::Pause).await
    }

    pub async fn toggle_playback(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlayback).await
    }

    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.send(PlayerCommand::Seek(seconds)).await
    }

    pub async fn set_volume(&self, level: i32) -> Result<()> {
        self.send(PlayerCommand::SetVolume(level)).await
    }

    pub async fn next(&self) -> Result<()> {
        self.send(PlayerCommand::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.send(PlayerCommand::Previous).await
    }

    /// Select a playlist entry, waiting for the task to accept the index
    pub async fn select(&self, index: usize) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(PlayerCommand::Select { index, reply }).await?;
        rx.await.map_err(|_| PlaybackError::ChannelClosed)?
    }

    /// Route a key press, returning the action taken
    pub async fn key(&self, event: KeyEvent) -> Result<Option<ShortcutAction>> {
        let (reply, rx) = oneshot::channel();
        self.send(PlayerCommand::Key {
            event,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| PlaybackError::ChannelClosed)
    }

    pub fn signals(&self) -> SignalSender {
        SignalSender {
            commands: self.commands.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Latest published view
    pub fn view(&self) -> PlayerView {
        self.view.borrow().clone()
    }

    pub fn view_updates(&self) -> watch::Receiver<PlayerView> {
        self.view.clone()
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(self) -> Result<()> {
        // A closed channel means the task is already gone.
        let _ = self.commands.send(PlayerCommand::Shutdown).await;
        self.task.await.map_err(|e| {
            tracing::error!(error = %e, "player task failed");
            PlaybackError::ChannelClosed
        })
    }
}

async fn run<S: KeyValueStore>(
    mut session: PlayerSession<S>,
    mut commands: mpsc::Receiver<PlayerCommand>,
    events: broadcast::Sender<PlayerEvent>,
    view: watch::Sender<PlayerView>,
    poll_interval: Duration,
) {
    let mut poll = time::interval(poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut timers: JoinSet<Deferred> = JoinSet::new();
    let mut was_polling = false;

    tracing::debug!(?poll_interval, "player task started");

    loop {
        let polling = session.is_polling();
        if polling && !was_polling {
            // First sample one full period after playback starts.
            poll.reset();
        }
        was_polling = polling;

        tokio::select! {
            command = commands.recv() => match command {
                None | Some(PlayerCommand::Shutdown) => break,
                Some(command) => apply(&mut session, command),
            },
            Some(fired) = timers.join_next() => match fired {
                Ok(deferred) => session.fire_deferred(deferred),
                Err(e) => tracing::warn!(error = %e, "deferred action task failed"),
            },
            _ = poll.tick(), if polling => {
                session.poll();
            }
        }

        for deferred in session.take_deferred() {
            timers.spawn(async move {
                time::sleep(deferred.delay).await;
                deferred
            });
        }

        for event in session.drain_events() {
            // No subscribers is fine.
            let _ = events.send(event);
        }
        view.send_replace(session.view());
    }

    timers.abort_all();
    tracing::debug!("player task stopped");
}

fn apply<S: KeyValueStore>(session: &mut PlayerSession<S>, command: PlayerCommand) {
    match command {
        PlayerCommand::Play => session.play(),
        PlayerCommand::Pause => session.pause(),
        PlayerCommand::TogglePlayback => session.toggle_playback(),
        PlayerCommand::Seek(seconds) => session.seek_to(seconds),
        PlayerCommand::SeekBy(delta) => session.seek_by(delta),
        PlayerCommand::SetVolume(level) => {
            session.set_volume(level);
        }
        PlayerCommand::Next => {
            session.next();
        }
        PlayerCommand::Previous => {
            session.previous();
        }
        PlayerCommand::Select { index, reply } => {
            let _ = reply.send(session.select_track(index));
        }
        PlayerCommand::ToggleShuffle => session.toggle_shuffle(),
        PlayerCommand::SetRepeat(mode) => session.set_repeat(mode),
        PlayerCommand::CycleRepeat => {
            session.cycle_repeat();
        }
        PlayerCommand::ToggleTheme => session.toggle_theme(),
        PlayerCommand::Key { event, reply } => {
            let action = session.handle_key(&event);
            if let Some(reply) = reply {
                let _ = reply.send(action);
            }
        }
        PlayerCommand::Signal(signal) => session.handle_signal(signal),
        PlayerCommand::Attach(adapter) => session.attach_adapter(adapter),
        // Handled by the task loop.
        PlayerCommand::Shutdown => {}
    }
}
