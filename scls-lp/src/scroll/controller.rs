//! Full-page scroll controller
//!
//! Owns the current section index and moves between whole-viewport sections
//! in response to wheel, keyboard, touch and explicit scroll requests.
//!
//! # Transition rules
//!
//! - A transition is rejected while a previous one is still animating
//!   (busy window, default 800ms). Input during the busy window is dropped,
//!   never queued.
//! - Targets outside `0..section_count` and the current index itself are
//!   rejected, so each accepted transition produces exactly one
//!   `SectionChanged` notification.
//! - Below the mobile breakpoint the controller disables itself and the
//!   page falls back to native document scrolling.

use crate::input::{InputEvent, Key, Viewport};
use crate::{Error, Result};
use scls_common::config::ScrollConfig;
use scls_common::events::{Direction, EventBus, LandingEvent, ScrollRequest, ViewportMode};
use scls_common::Millis;
use std::sync::Arc;
use tracing::{debug, info};

/// Why a transition was not performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A transition animation is still in progress
    Busy,
    /// Target index outside the section sequence
    OutOfBounds,
    /// Target is the section already showing
    AlreadyCurrent,
    /// Mobile layout, native scrolling in effect
    Disabled,
}

/// Result of a transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accepted {
        from: usize,
        to: usize,
        direction: Direction,
    },
    Rejected(Rejection),
}

impl Transition {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Transition::Accepted { .. })
    }
}

/// Section index state machine
pub struct ScrollController {
    section_count: usize,
    current: usize,
    busy_until: Option<Millis>,
    mode: ViewportMode,
    viewport: Viewport,
    touch_start_y: Option<f64>,
    transition_ms: u64,
    breakpoint_px: u32,
    min_swipe_px: f64,
    bus: Arc<EventBus>,
}

impl ScrollController {
    /// Create a controller positioned at section 0
    pub fn new(
        section_count: usize,
        config: &ScrollConfig,
        viewport: Viewport,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        if section_count == 0 {
            return Err(Error::InvalidInput(
                "scroll controller needs at least one section".to_string(),
            ));
        }

        let mode = if viewport.is_mobile(config.mobile_breakpoint_px) {
            ViewportMode::Mobile
        } else {
            ViewportMode::Desktop
        };

        Ok(Self {
            section_count,
            current: 0,
            busy_until: None,
            mode,
            viewport,
            touch_start_y: None,
            transition_ms: config.transition_ms,
            breakpoint_px: config.mobile_breakpoint_px,
            min_swipe_px: config.min_swipe_px,
            bus,
        })
    }

    pub fn current_section(&self) -> usize {
        self.current
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// True while full-page interception is active (desktop layout)
    pub fn is_enabled(&self) -> bool {
        self.mode == ViewportMode::Desktop
    }

    /// True while a transition animation is running at `now`
    pub fn is_busy(&self, now: Millis) -> bool {
        self.busy_until.map_or(false, |until| now < until)
    }

    /// Clear the busy flag once its animation window has elapsed
    pub fn poll(&mut self, now: Millis) {
        if let Some(until) = self.busy_until {
            if now >= until {
                self.busy_until = None;
                debug!("Transition to section {} settled at {}", self.current, now);
            }
        }
    }

    /// Vertical translation applied to the section stack (px)
    ///
    /// Always `-(index * viewport height)` on desktop; zero in mobile layout
    /// where the document scrolls natively.
    pub fn offset_px(&self) -> f64 {
        match self.mode {
            ViewportMode::Desktop => -((self.current as f64) * f64::from(self.viewport.height)),
            ViewportMode::Mobile => 0.0,
        }
    }

    /// Move one section up or down
    pub fn advance(&mut self, direction: Direction, now: Millis) -> Transition {
        let target = self.current as isize + direction.step();
        if target < 0 {
            // Still honour the disabled/busy guards ahead of bounds
            return self.guard(now).unwrap_or(Transition::Rejected(Rejection::OutOfBounds));
        }
        self.jump_to(target as usize, now)
    }

    /// Move directly to `index`
    pub fn jump_to(&mut self, index: usize, now: Millis) -> Transition {
        if let Some(rejected) = self.guard(now) {
            return rejected;
        }
        if index >= self.section_count {
            debug!(
                "Rejected transition to {} (only {} sections)",
                index, self.section_count
            );
            return Transition::Rejected(Rejection::OutOfBounds);
        }
        if index == self.current {
            return Transition::Rejected(Rejection::AlreadyCurrent);
        }

        let from = self.current;
        let direction = if index > from {
            Direction::Down
        } else {
            Direction::Up
        };

        self.current = index;
        self.busy_until = Some(now.plus(self.transition_ms));

        info!("Section {} -> {} ({:?})", from, index, direction);
        self.bus.emit_lossy(LandingEvent::SectionChanged {
            section_index: index,
            previous_section: Some(from),
            direction: Some(direction),
            at: now,
        });

        Transition::Accepted {
            from,
            to: index,
            direction,
        }
    }

    /// Handle an external scroll-to-section request
    pub fn request(&mut self, request: ScrollRequest, now: Millis) -> Transition {
        self.jump_to(request.section_index, now)
    }

    /// Handle global navigation input
    ///
    /// Returns `None` when the event is not a navigation input for this
    /// controller (disabled, unhandled key, zero wheel delta, touch start,
    /// swipe shorter than the minimum) and should be left to the browser.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Transition> {
        if !self.is_enabled() {
            return None;
        }

        let now = event.at();
        match *event {
            InputEvent::Wheel { delta_y, .. } => {
                let direction = Direction::from_wheel_delta(delta_y)?;
                Some(self.advance(direction, now))
            }
            InputEvent::Key { key, .. } => match key {
                Key::Home => Some(self.jump_to(0, now)),
                Key::End => Some(self.jump_to(self.section_count - 1, now)),
                other => {
                    let direction = other.step_direction()?;
                    Some(self.advance(direction, now))
                }
            },
            InputEvent::TouchStart { y, .. } => {
                self.touch_start_y = Some(y);
                None
            }
            InputEvent::TouchEnd { y, .. } => {
                let start = self.touch_start_y.take()?;
                let diff = start - y;
                if diff.abs() <= self.min_swipe_px {
                    return None;
                }
                // Finger moving up reveals the next section
                let direction = if diff > 0.0 {
                    Direction::Down
                } else {
                    Direction::Up
                };
                Some(self.advance(direction, now))
            }
        }
    }

    /// Apply a new viewport size
    ///
    /// Returns the new mode when the width crossed the breakpoint. Either
    /// way of crossing resets the controller to section 0 with no pending
    /// transition; the offset follows the new height automatically.
    pub fn resize(&mut self, viewport: Viewport, now: Millis) -> Option<ViewportMode> {
        self.viewport = viewport;

        let mode = if viewport.is_mobile(self.breakpoint_px) {
            ViewportMode::Mobile
        } else {
            ViewportMode::Desktop
        };
        if mode == self.mode {
            return None;
        }

        self.mode = mode;
        self.current = 0;
        self.busy_until = None;
        self.touch_start_y = None;

        info!(
            "Viewport {}x{} crossed {}px breakpoint: {:?} layout",
            viewport.width, viewport.height, self.breakpoint_px, mode
        );
        self.bus
            .emit_lossy(LandingEvent::ViewportModeChanged { mode, at: now });
        Some(mode)
    }

    fn guard(&mut self, now: Millis) -> Option<Transition> {
        if !self.is_enabled() {
            return Some(Transition::Rejected(Rejection::Disabled));
        }
        self.poll(now);
        if self.is_busy(now) {
            debug!("Dropped transition request during busy window at {}", now);
            return Some(Transition::Rejected(Rejection::Busy));
        }
        None
    }
}
