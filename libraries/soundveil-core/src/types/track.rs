use serde::{Deserialize, Serialize};

/// Base URL used to address a hosted video by id
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// A playable item, addressed by the external video id
///
/// Identity is the `id`; the title is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// External video identifier
    pub id: String,
    /// Display title
    pub title: String,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Public watch URL for this track
    pub fn watch_url(&self) -> String {
        format!("{WATCH_URL_BASE}{}", self.id)
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl std::hash::Hash for Track {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
