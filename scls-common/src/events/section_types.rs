//! Section navigation payload types

use serde::{Deserialize, Serialize};

/// Direction of travel through the section sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Towards the last section
    Down,
}

impl Direction {
    /// Direction of a wheel delta; zero carries no direction
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Direction::Down)
        } else if delta_y < 0.0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    /// Direction implied by moving from one index to another
    pub fn between(from: usize, to: usize) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Down),
            std::cmp::Ordering::Less => Some(Direction::Up),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Signed index step (+1 down, -1 up)
    pub fn step(&self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Payload of a section change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChange {
    pub section_index: usize,
    pub previous_section: Option<usize>,
    pub direction: Option<Direction>,
}

/// Request to move the full-page view to a section
///
/// Produced by navigation, hero and scroll-to-top controls; consumed by the
/// scroll controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub section_index: usize,
}

impl ScrollRequest {
    pub fn to(section_index: usize) -> Self {
        Self { section_index }
    }
}

/// Layout mode selected by the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    /// Full-page section scrolling with input interception
    Desktop,
    /// Native document scrolling, nothing intercepted
    Mobile,
}
