//! Wheel gesture accumulator
//!
//! Sums absolute wheel delta until a threshold is crossed so that a single
//! flick of a trackpad does not skip several sub-steps. The running total
//! is discarded when the direction reverses or when no input arrives within
//! the window.

use scls_common::events::Direction;
use scls_common::Millis;
use tracing::trace;

/// Threshold-and-window accumulator for wheel deltas
#[derive(Debug, Clone)]
pub struct GestureAccumulator {
    threshold: f64,
    window_ms: u64,
    accumulated: f64,
    last_direction: Option<Direction>,
    last_at: Option<Millis>,
}

impl GestureAccumulator {
    pub fn new(threshold: f64, window_ms: u64) -> Self {
        Self {
            threshold,
            window_ms,
            accumulated: 0.0,
            last_direction: None,
            last_at: None,
        }
    }

    /// Feed one wheel delta
    ///
    /// Returns the gesture direction when the accumulated magnitude reaches
    /// the threshold; the accumulator is then empty again. A zero delta is
    /// ignored entirely and does not refresh the window.
    pub fn push(&mut self, delta_y: f64, at: Millis) -> Option<Direction> {
        let direction = Direction::from_wheel_delta(delta_y)?;

        let expired = self
            .last_at
            .map_or(false, |last| at.since(last) > self.window_ms);
        let reversed = self.last_direction.map_or(false, |last| last != direction);

        if expired || reversed {
            trace!(
                "Gesture accumulator reset (expired: {}, reversed: {})",
                expired,
                reversed
            );
            self.accumulated = 0.0;
        }

        self.accumulated += delta_y.abs();
        self.last_direction = Some(direction);
        self.last_at = Some(at);

        if self.accumulated >= self.threshold {
            self.accumulated = 0.0;
            return Some(direction);
        }
        None
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_direction = None;
        self.last_at = None;
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_crossing() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        assert_eq!(acc.push(250.0, Millis(0)), None);
        assert_eq!(acc.push(250.0, Millis(100)), Some(Direction::Down));
        assert_eq!(acc.accumulated(), 0.0);
    }

    #[test]
    fn test_reversal_discards_total() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        assert_eq!(acc.push(250.0, Millis(0)), None);
        assert_eq!(acc.push(-250.0, Millis(100)), None);
        assert_eq!(acc.accumulated(), 250.0);
    }

    #[test]
    fn test_window_expiry() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        assert_eq!(acc.push(-300.0, Millis(0)), None);
        assert_eq!(acc.push(-300.0, Millis(3001)), None);
        assert_eq!(acc.accumulated(), 300.0);
        // Exactly at the window edge still counts
        assert_eq!(acc.push(-100.0, Millis(6001)), Some(Direction::Up));
    }

    #[test]
    fn test_zero_delta_ignored() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        acc.push(200.0, Millis(0));
        assert_eq!(acc.push(0.0, Millis(10)), None);
        assert_eq!(acc.accumulated(), 200.0);
    }

    #[test]
    fn test_single_large_delta() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        assert_eq!(acc.push(400.0, Millis(0)), Some(Direction::Down));
    }

    #[test]
    fn test_reset() {
        let mut acc = GestureAccumulator::new(400.0, 3000);
        acc.push(350.0, Millis(0));
        acc.reset();
        assert_eq!(acc.push(100.0, Millis(10)), None);
        assert_eq!(acc.accumulated(), 100.0);
    }
}
