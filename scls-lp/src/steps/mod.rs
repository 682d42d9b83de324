//! Multi-step sections
//!
//! About and Services show their content progressively. Each owns a small
//! step index that navigation input moves through before control returns
//! to the page-level scroll controller.

mod about;
mod services;

pub use about::AboutInterceptor;
pub use services::ServicesInterceptor;

use scls_common::events::Direction;

/// Bounded step index within one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    current: usize,
    count: usize,
}

/// Where a section starts when it becomes current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySeeding {
    First,
    Last,
    /// Resume wherever the section was left
    Keep,
}

impl EntrySeeding {
    /// Entering while scrolling up starts at the end of the sequence
    pub fn from_entry_direction(direction: Option<Direction>) -> Self {
        match direction {
            Some(Direction::Up) => EntrySeeding::Last,
            _ => EntrySeeding::First,
        }
    }
}

impl StepSequence {
    /// A sequence of `count` steps starting at 0 (at least one step)
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last(&self) -> usize {
        self.count - 1
    }

    /// True when no further step exists in `direction`
    pub fn at_boundary(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.current == 0,
            Direction::Down => self.current == self.last(),
        }
    }

    /// Move one step; returns the new index, or `None` at the boundary
    pub fn step(&mut self, direction: Direction) -> Option<usize> {
        if self.at_boundary(direction) {
            return None;
        }
        self.current = match direction {
            Direction::Up => self.current - 1,
            Direction::Down => self.current + 1,
        };
        Some(self.current)
    }

    /// Apply entry seeding; returns true if the index changed
    pub fn seed(&mut self, seeding: EntrySeeding) -> bool {
        let target = match seeding {
            EntrySeeding::First => 0,
            EntrySeeding::Last => self.last(),
            EntrySeeding::Keep => self.current,
        };
        let changed = target != self.current;
        self.current = target;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_bounds() {
        let mut seq = StepSequence::new(3);
        assert!(seq.at_boundary(Direction::Up));
        assert_eq!(seq.step(Direction::Up), None);
        assert_eq!(seq.step(Direction::Down), Some(1));
        assert_eq!(seq.step(Direction::Down), Some(2));
        assert_eq!(seq.step(Direction::Down), None);
        assert!(seq.at_boundary(Direction::Down));
    }

    #[test]
    fn test_seeding() {
        let mut seq = StepSequence::new(3);
        assert!(seq.seed(EntrySeeding::from_entry_direction(Some(Direction::Up))));
        assert_eq!(seq.current(), 2);
        assert!(!seq.seed(EntrySeeding::Keep));
        assert!(seq.seed(EntrySeeding::from_entry_direction(Some(Direction::Down))));
        assert_eq!(seq.current(), 0);
        assert_eq!(EntrySeeding::from_entry_direction(None), EntrySeeding::First);
    }

    #[test]
    fn test_zero_count_clamped() {
        let seq = StepSequence::new(0);
        assert_eq!(seq.count(), 1);
        assert!(seq.at_boundary(Direction::Down));
    }
}
