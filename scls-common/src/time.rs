//! Millisecond clock
//!
//! Every interaction state machine is driven by explicit timestamps carried
//! on the input events instead of reading a wall clock, so transitions,
//! lock windows and animation frames replay identically in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Monotonic timestamp in milliseconds since an arbitrary origin
/// (page load, trace start).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Timestamp `ms` milliseconds later (saturating)
    pub fn plus(self, ms: u64) -> Millis {
        Millis(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`; zero if `earlier` is in the future
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn as_duration(self) -> Duration {
        millis_to_duration(self.0)
    }
}

impl From<u64> for Millis {
    fn from(ms: u64) -> Self {
        Millis(ms)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
