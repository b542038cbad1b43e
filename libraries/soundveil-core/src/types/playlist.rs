use super::Track;
use crate::error::{CoreError, Result};

/// Ordered, non-empty list of tracks with a cursor on the current one
///
/// `current_index` always lies in `[0, len)`; every mutation that could
/// break that is rejected instead of clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
    current_index: usize,
}

impl Playlist {
    /// Create a playlist positioned on the first track
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(CoreError::EmptyPlaylist);
        }

        Ok(Self {
            tracks,
            current_index: 0,
        })
    }

    /// The stock three-track playlist shipped with the player
    pub fn builtin() -> Self {
        Self {
            tracks: vec![
                Track::new("dQw4w9WgXcQ", "Rick Astley – Never Gonna Give You Up"),
                Track::new("3tmd-ClpJxA", "Eminem – Lose Yourself"),
                Track::new("JGwWNGJdvx8", "Ed Sheeran – Shape of You"),
            ],
            current_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &Track {
        &self.tracks[self.current_index]
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.tracks.len()
    }

    /// Move the cursor to `index`
    pub fn select(&mut self, index: usize) -> Result<&Track> {
        if !self.contains_index(index) {
            return Err(CoreError::IndexOutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }

        self.current_index = index;
        Ok(&self.tracks[index])
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::builtin()
    }
}
