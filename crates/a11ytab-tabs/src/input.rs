//! Keyboard resolution
//!
//! Left/Up move to the previous trigger and Right/Down to the next one, with
//! wraparound. Keys pressed with Meta or Alt held are left to the browser.

use a11ytab_dom::{Key, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Map a keydown event to a navigation direction, if it is one we handle.
pub fn resolve_key(event: &UiEvent) -> Option<Direction> {
    let modifiers = event.modifiers();
    if modifiers.meta || modifiers.alt {
        return None;
    }

    match event.key()? {
        Key::ArrowLeft | Key::ArrowUp => Some(Direction::Previous),
        Key::ArrowRight | Key::ArrowDown => Some(Direction::Next),
        Key::Other(_) => None,
    }
}

/// Adjacent index with wraparound. `len` must be non-zero.
pub(crate) fn step(current: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Previous => (current + len - 1) % len,
        Direction::Next => (current + 1) % len,
    }
}
