//! UI events delivered to components
//!
//! Only the two event kinds the tab component listens to are modelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyboard key of a keydown event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value, including the legacy
    /// `Left`/`Up`/`Right`/`Down` spellings.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowDown" | "Down" => Key::ArrowDown,
            other => Key::Other(other.to_string()),
        }
    }

    /// Parse a legacy `KeyboardEvent.keyCode`.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            other => Key::Other(other.to_string()),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::from_key_name(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };
}

#[derive(Debug, Clone)]
pub struct UiEvent {
    kind: EventKind,
    target: NodeId,
    current_target: NodeId,
    key: Option<Key>,
    modifiers: Modifiers,
    default_prevented: bool,
}

impl UiEvent {
    pub fn click(target: NodeId) -> Self {
        Self::click_with(target, Modifiers::NONE)
    }

    pub fn click_with(target: NodeId, modifiers: Modifiers) -> Self {
        Self {
            kind: EventKind::Click,
            target,
            current_target: target,
            key: None,
            modifiers,
            default_prevented: false,
        }
    }

    pub fn key_down(target: NodeId, key: Key, modifiers: Modifiers) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            current_target: target,
            key: Some(key),
            modifiers,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Node the event originated on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listener is currently handling the event.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A custom event dispatched on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedEvent {
    pub name: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub dispatched_at: DateTime<Utc>,
}

impl DispatchedEvent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bubbles: true,
            cancelable: true,
            dispatched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_key_name("Down"), Key::ArrowDown);
        assert_eq!(Key::from("Enter"), Key::Other("Enter".to_string()));
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_key_code(37), Key::ArrowLeft);
        assert_eq!(Key::from_key_code(38), Key::ArrowUp);
        assert_eq!(Key::from_key_code(39), Key::ArrowRight);
        assert_eq!(Key::from_key_code(40), Key::ArrowDown);
        assert_eq!(Key::from_key_code(13), Key::Other("13".to_string()));
    }

    #[test]
    fn test_prevent_default() {
        let mut event = UiEvent::click(NodeId(3));
        assert_eq!(event.kind(), EventKind::Click);
        assert_eq!(event.current_target(), NodeId(3));
        assert!(!event.is_default_prevented());

        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
