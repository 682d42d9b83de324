//! Services section: three steps driven by accumulated wheel input

use super::{EntrySeeding, StepSequence};
use crate::input::InputEvent;
use crate::scroll::{GestureAccumulator, InputInterceptor, InterceptContext, Interception};
use scls_common::config::ServicesConfig;
use scls_common::events::{Direction, LandingEvent, SectionChange};
use scls_common::SectionId;
use tracing::debug;

pub const SERVICES_STEPS: usize = 3;

/// Steps through the Services cards once enough wheel travel accumulates
///
/// Wheel input below the threshold is swallowed. When the threshold is
/// reached at the first or last step the event is handed to the scroll
/// controller, which leaves the section. Keys are not intercepted.
pub struct ServicesInterceptor {
    steps: StepSequence,
    accumulator: GestureAccumulator,
}

impl ServicesInterceptor {
    pub fn new(config: &ServicesConfig) -> Self {
        Self {
            steps: StepSequence::new(SERVICES_STEPS),
            accumulator: GestureAccumulator::new(config.wheel_threshold, config.window_ms),
        }
    }
}

impl InputInterceptor for ServicesInterceptor {
    fn section(&self) -> SectionId {
        SectionId::Services
    }

    fn intercept(&mut self, event: &InputEvent, ctx: &InterceptContext<'_>) -> Interception {
        let InputEvent::Wheel { delta_y, .. } = *event else {
            return Interception::Pass;
        };
        if Direction::from_wheel_delta(delta_y).is_none() {
            return Interception::Pass;
        }

        let Some(direction) = self.accumulator.push(delta_y, ctx.now) else {
            return Interception::Consumed;
        };

        match self.steps.step(direction) {
            Some(step) => {
                debug!("Services step -> {}", step);
                ctx.bus.emit_lossy(LandingEvent::SubStepChanged {
                    section: SectionId::Services,
                    step,
                    at: ctx.now,
                });
                Interception::Consumed
            }
            None => {
                debug!("Services boundary reached going {:?}", direction);
                Interception::Pass
            }
        }
    }

    fn on_section_changed(
        &mut self,
        change: &SectionChange,
        entered: bool,
        ctx: &InterceptContext<'_>,
    ) {
        self.accumulator.reset();
        if !entered {
            return;
        }

        let seeding = EntrySeeding::from_entry_direction(change.direction);
        if self.steps.seed(seeding) {
            debug!(
                "Services entered {:?}, starting at step {}",
                change.direction,
                self.steps.current()
            );
            ctx.bus.emit_lossy(LandingEvent::SubStepChanged {
                section: SectionId::Services,
                step: self.steps.current(),
                at: ctx.now,
            });
        }
    }

    fn reset(&mut self) {
        self.accumulator.reset();
    }

    fn current_step(&self) -> usize {
        self.steps.current()
    }

    fn step_count(&self) -> usize {
        self.steps.count()
    }
}
