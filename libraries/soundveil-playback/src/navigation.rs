//! Navigation policy
//!
//! Decides which track plays next or previous from the current index,
//! playlist length and the shuffle/repeat preferences. Nothing here touches
//! the player; callers act on the returned index.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soundveil_core::{PlaybackPreferences, RepeatMode};

/// What to do when the current track finishes on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEndAction {
    /// Repeat-one: play the same track again
    Replay,
    /// Advance to this playlist index
    ChangeTrack(usize),
    /// End of the playlist with repeat off
    Stop,
}

/// Next/previous index policy
///
/// Shuffle picks uniformly from the whole playlist and may pick the
/// current track again.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    rng: StdRng,
}

impl NavigationPolicy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic shuffle sequence, for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Index after `current`, or `None` at the end of a non-repeating list
    pub fn next_index(
        &mut self,
        current: usize,
        len: usize,
        preferences: &PlaybackPreferences,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }

        if preferences.shuffle_enabled {
            return Some(self.rng.gen_range(0..len));
        }

        let candidate = current + 1;
        if candidate < len {
            Some(candidate)
        } else if preferences.repeat_mode == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index before `current`, or `None` at the start of a non-repeating list
    pub fn prev_index(
        &mut self,
        current: usize,
        len: usize,
        preferences: &PlaybackPreferences,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }

        if preferences.shuffle_enabled {
            return Some(self.rng.gen_range(0..len));
        }

        match current.checked_sub(1) {
            Some(candidate) => Some(candidate),
            None if preferences.repeat_mode == RepeatMode::All => Some(len - 1),
            None => None,
        }
    }

    /// Decide what follows a track that finished naturally
    pub fn on_track_ended(
        &mut self,
        current: usize,
        len: usize,
        preferences: &PlaybackPreferences,
    ) -> TrackEndAction {
        if preferences.repeat_mode == RepeatMode::One {
            return TrackEndAction::Replay;
        }

        match self.next_index(current, len, preferences) {
            Some(index) => TrackEndAction::ChangeTrack(index),
            None => TrackEndAction::Stop,
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new()
    }
}
