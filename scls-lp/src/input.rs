//! Raw user input model
//!
//! Wheel, keyboard and touch input as delivered by the host UI loop. Every
//! event carries its own timestamp so handlers never consult a wall clock.

use scls_common::events::Direction;
use scls_common::Millis;
use serde::{Deserialize, Serialize};

/// Keys the page reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    PageDown,
    PageUp,
    Home,
    End,
    /// Any key the page does not handle
    #[serde(other)]
    Other,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowDown" => Key::ArrowDown,
            "ArrowUp" => Key::ArrowUp,
            "PageDown" => Key::PageDown,
            "PageUp" => Key::PageUp,
            "Home" => Key::Home,
            "End" => Key::End,
            _ => Key::Other,
        }
    }

    /// Single-step direction for arrow and page keys
    pub fn step_direction(&self) -> Option<Direction> {
        match self {
            Key::ArrowDown | Key::PageDown => Some(Direction::Down),
            Key::ArrowUp | Key::PageUp => Some(Direction::Up),
            _ => None,
        }
    }
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Wheel or trackpad scroll; positive delta scrolls down
    Wheel { delta_y: f64, at: Millis },
    /// Key press
    Key { key: Key, at: Millis },
    /// Finger down at viewport y
    TouchStart { y: f64, at: Millis },
    /// Finger up at viewport y
    TouchEnd { y: f64, at: Millis },
}

impl InputEvent {
    pub fn wheel(delta_y: f64, at: u64) -> Self {
        InputEvent::Wheel {
            delta_y,
            at: Millis(at),
        }
    }

    pub fn key(key: Key, at: u64) -> Self {
        InputEvent::Key { key, at: Millis(at) }
    }

    pub fn at(&self) -> Millis {
        match self {
            InputEvent::Wheel { at, .. }
            | InputEvent::Key { at, .. }
            | InputEvent::TouchStart { at, .. }
            | InputEvent::TouchEnd { at, .. } => *at,
        }
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Narrower than the breakpoint means native scrolling
    pub fn is_mobile(&self, breakpoint_px: u32) -> bool {
        self.width < breakpoint_px
    }
}
