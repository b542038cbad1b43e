//! Keyboard shortcuts
//!
//! Maps physical key codes to player actions. Keys typed into text fields
//! are never treated as shortcuts.

use crate::settings::ShortcutSettings;
use soundveil_core::MAX_VOLUME;

/// Physical keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyM,
    KeyN,
    KeyP,
    Other,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code` value
    pub fn from_dom_code(code: &str) -> Self {
        match code {
            "Space" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "KeyM" => Self::KeyM,
            "KeyN" => Self::KeyN,
            "KeyP" => Self::KeyP,
            _ => Self::Other,
        }
    }
}

/// Where keyboard focus was when the key went down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// Page body or a non-editable element
    #[default]
    Document,
    /// Text input or textarea
    TextEntry,
}

impl FocusTarget {
    /// Classify a focused element by its tag name
    pub fn from_tag_name(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea") {
            Self::TextEntry
        } else {
            Self::Document
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(code: KeyCode, focus: FocusTarget) -> Self {
        Self { code, focus }
    }

    /// Build from DOM values: `event.code` and the focused element's tag
    pub fn from_dom(code: &str, focused_tag: Option<&str>) -> Self {
        Self {
            code: KeyCode::from_dom_code(code),
            focus: focused_tag.map_or(FocusTarget::Document, FocusTarget::from_tag_name),
        }
    }
}

/// Action bound to a shortcut
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    TogglePlayback,
    /// Relative seek in seconds
    SeekBy(f64),
    /// Relative volume change
    VolumeBy(i32),
    ToggleMute,
    Next,
    Previous,
}

impl ShortcutAction {
    /// Whether the host should suppress the key's default behaviour
    /// (page scroll on Space)
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::TogglePlayback)
    }
}

/// Stateless key-to-action router
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardDispatcher {
    seek_step: f64,
    volume_step: i32,
    unmute_level: u8,
}

impl KeyboardDispatcher {
    pub fn new(settings: &ShortcutSettings) -> Self {
        Self {
            seek_step: settings.seek_step_secs,
            volume_step: i32::from(settings.volume_step),
            unmute_level: settings.unmute_level.min(MAX_VOLUME),
        }
    }

    /// Resolve a key press to an action, `None` when unbound or typed
    /// into a text field
    pub fn resolve(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        if event.focus == FocusTarget::TextEntry {
            return None;
        }

        match event.code {
            KeyCode::Space => Some(ShortcutAction::TogglePlayback),
            KeyCode::ArrowRight => Some(ShortcutAction::SeekBy(self.seek_step)),
            KeyCode::ArrowLeft => Some(ShortcutAction::SeekBy(-self.seek_step)),
            KeyCode::ArrowUp => Some(ShortcutAction::VolumeBy(self.volume_step)),
            KeyCode::ArrowDown => Some(ShortcutAction::VolumeBy(-self.volume_step)),
            KeyCode::KeyM => Some(ShortcutAction::ToggleMute),
            KeyCode::KeyN => Some(ShortcutAction::Next),
            KeyCode::KeyP => Some(ShortcutAction::Previous),
            KeyCode::Other => None,
        }
    }

    /// Volume the mute toggle moves to from `current`
    pub fn mute_target(&self, current: u8) -> u8 {
        if current > 0 {
            0
        } else {
            self.unmute_level
        }
    }
}

impl Default for KeyboardDispatcher {
    fn default() -> Self {
        Self::new(&ShortcutSettings::default())
    }
}
