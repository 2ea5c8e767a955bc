//! Input types for unified mouse/touch handling.
//!
//! The core never reads a clock; pointer-down events carry the host's
//! millisecond timestamp so double-press detection stays deterministic.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform multi-select chord is held.
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling. Positions are in
/// screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        /// Host timestamp in milliseconds.
        timestamp_ms: u64,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Tracks which pointers the editor has captured for an in-flight gesture.
///
/// Hosts may deliver a release for a pointer that was never captured (or
/// was already released); that is tolerated and only logged.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    captured: HashSet<u64>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, pointer_id: u64) {
        self.captured.insert(pointer_id);
    }

    pub fn release(&mut self, pointer_id: u64) {
        if !self.captured.remove(&pointer_id) {
            log::debug!("release of uncaptured pointer {pointer_id} ignored");
        }
    }

    pub fn release_all(&mut self) {
        self.captured.clear();
    }

    pub fn is_captured(&self, pointer_id: u64) -> bool {
        self.captured.contains(&pointer_id)
    }
}
