//! About section: two steps, immediate stepping with a short lock

use super::StepSequence;
use crate::input::InputEvent;
use crate::scroll::{InputInterceptor, InterceptContext, Interception};
use scls_common::config::AboutConfig;
use scls_common::events::{Direction, LandingEvent};
use scls_common::{Millis, SectionId};
use tracing::debug;

pub const ABOUT_STEPS: usize = 2;

/// Steps through the About content on wheel and arrow/page keys
///
/// Every accepted step locks the section for `step_lock_ms`; input arriving
/// during the lock is swallowed so a long trackpad swipe cannot also
/// trigger a section change. The step is kept across visits.
pub struct AboutInterceptor {
    steps: StepSequence,
    lock_ms: u64,
    locked_until: Option<Millis>,
}

impl AboutInterceptor {
    pub fn new(config: &AboutConfig) -> Self {
        Self {
            steps: StepSequence::new(ABOUT_STEPS),
            lock_ms: config.step_lock_ms,
            locked_until: None,
        }
    }

    fn is_locked(&self, now: Millis) -> bool {
        self.locked_until.map_or(false, |until| now < until)
    }
}

impl InputInterceptor for AboutInterceptor {
    fn section(&self) -> SectionId {
        SectionId::About
    }

    fn intercept(&mut self, event: &InputEvent, ctx: &InterceptContext<'_>) -> Interception {
        let direction = match *event {
            InputEvent::Wheel { delta_y, .. } => Direction::from_wheel_delta(delta_y),
            InputEvent::Key { key, .. } => key.step_direction(),
            _ => None,
        };
        let Some(direction) = direction else {
            return Interception::Pass;
        };

        if self.is_locked(ctx.now) {
            return Interception::Consumed;
        }

        match self.steps.step(direction) {
            Some(step) => {
                self.locked_until = Some(ctx.now.plus(self.lock_ms));
                debug!("About step -> {}", step);
                ctx.bus.emit_lossy(LandingEvent::SubStepChanged {
                    section: SectionId::About,
                    step,
                    at: ctx.now,
                });
                Interception::Consumed
            }
            None => Interception::Pass,
        }
    }

    fn reset(&mut self) {
        self.locked_until = None;
    }

    fn current_step(&self) -> usize {
        self.steps.current()
    }

    fn step_count(&self) -> usize {
        self.steps.count()
    }
}
