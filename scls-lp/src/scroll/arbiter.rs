//! Two-tier input dispatch
//!
//! Section-local interceptors always see input before the global scroll
//! controller. Interceptors are held in an explicit priority-ordered list:
//! higher priority first, registration order on ties, with the controller
//! as the final fallback. An event handled by an interceptor never reaches
//! the controller, so one gesture is never handled twice.

use super::controller::{ScrollController, Transition};
use crate::input::InputEvent;
use scls_common::events::{drain_pending, EventBus, LandingEvent, SectionChange};
use scls_common::{Millis, SectionId, SectionRegistry};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Interceptor verdict for one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Handled (or deliberately swallowed); stop dispatching
    Consumed,
    /// Not handled; offer the event to the next handler
    Pass,
}

/// State handed to an interceptor alongside each event
pub struct InterceptContext<'a> {
    /// Timestamp of the event being dispatched
    pub now: Millis,
    /// Bus for sub-step notifications
    pub bus: &'a EventBus,
}

/// A section that captures navigation input while it is showing
pub trait InputInterceptor: Send {
    /// Section this interceptor belongs to
    fn section(&self) -> SectionId;

    /// Offer an event; only called while the section is current and the
    /// controller is idle
    fn intercept(&mut self, event: &InputEvent, ctx: &InterceptContext<'_>) -> Interception;

    /// Observe a section change; `entered` is true when the change made
    /// this interceptor's section current
    fn on_section_changed(
        &mut self,
        _change: &SectionChange,
        _entered: bool,
        _ctx: &InterceptContext<'_>,
    ) {
    }

    /// Drop transient state (locks, accumulators)
    fn reset(&mut self);

    fn current_step(&self) -> usize;

    fn step_count(&self) -> usize;
}

/// Which handler took an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A section-local interceptor consumed it
    Intercepted(SectionId),
    /// The scroll controller handled it
    Controller(Transition),
    /// Nobody handled it; native behaviour applies
    Ignored,
}

struct Registration {
    priority: i32,
    order: usize,
    /// `None` when the section is not part of the page
    section_index: Option<usize>,
    interceptor: Box<dyn InputInterceptor>,
}

/// Priority-ordered dispatcher in front of the scroll controller
pub struct InputArbiter {
    registrations: Vec<Registration>,
    next_order: usize,
    bus: Arc<EventBus>,
    rx: broadcast::Receiver<LandingEvent>,
}

impl InputArbiter {
    /// Create an arbiter listening on `bus`
    ///
    /// The subscription is taken immediately so no section change emitted
    /// after construction is missed.
    pub fn new(bus: Arc<EventBus>) -> Self {
        let rx = bus.subscribe();
        Self {
            registrations: Vec::new(),
            next_order: 0,
            bus,
            rx,
        }
    }

    /// Register an interceptor at `priority`
    ///
    /// An interceptor whose section is not in `registry` stays registered
    /// but never consumes input.
    pub fn register(
        &mut self,
        priority: i32,
        interceptor: Box<dyn InputInterceptor>,
        registry: &SectionRegistry,
    ) {
        let section = interceptor.section();
        let section_index = registry.index_of(section);
        if section_index.is_none() {
            warn!(
                "Section '{}' not found in registry, its interceptor will ignore input",
                section
            );
        } else {
            debug!("Registered '{}' interceptor at priority {}", section, priority);
        }

        let registration = Registration {
            priority,
            order: self.next_order,
            section_index,
            interceptor,
        };
        self.next_order += 1;

        // Keep the list in dispatch order
        let position = self
            .registrations
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(self.registrations.len());
        self.registrations.insert(position, registration);
    }

    /// Sections in dispatch order
    pub fn dispatch_order(&self) -> Vec<SectionId> {
        self.registrations
            .iter()
            .map(|r| r.interceptor.section())
            .collect()
    }

    pub fn interceptor(&self, section: SectionId) -> Option<&dyn InputInterceptor> {
        self.registrations
            .iter()
            .find(|r| r.interceptor.section() == section)
            .map(|r| r.interceptor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Deliver pending bus events to the interceptors
    ///
    /// Section changes are forwarded to every interceptor; a viewport mode
    /// change resets all of them.
    pub fn sync(&mut self, now: Millis) {
        let events = drain_pending(&mut self.rx);
        if events.is_empty() {
            return;
        }

        let ctx = InterceptContext {
            now,
            bus: &self.bus,
        };
        for event in events {
            match event {
                LandingEvent::SectionChanged { .. } => {
                    let Some(change) = event.as_section_change() else {
                        continue;
                    };
                    for reg in self.registrations.iter_mut() {
                        let entered = reg.section_index == Some(change.section_index);
                        reg.interceptor.on_section_changed(&change, entered, &ctx);
                    }
                }
                LandingEvent::ViewportModeChanged { mode, .. } => {
                    info!("Viewport mode now {:?}, resetting interceptors", mode);
                    for reg in self.registrations.iter_mut() {
                        reg.interceptor.reset();
                    }
                }
                _ => {}
            }
        }
    }

    /// Route one input event
    ///
    /// Interceptors are consulted only when their section is current and the
    /// controller is enabled and idle. Anything they pass falls through to
    /// the controller.
    pub fn dispatch(&mut self, event: &InputEvent, controller: &mut ScrollController) -> Dispatch {
        let now = event.at();
        self.sync(now);
        controller.poll(now);

        if controller.is_enabled() && !controller.is_busy(now) {
            let current = controller.current_section();
            let ctx = InterceptContext {
                now,
                bus: &self.bus,
            };
            for reg in self.registrations.iter_mut() {
                if reg.section_index != Some(current) {
                    continue;
                }
                if reg.interceptor.intercept(event, &ctx) == Interception::Consumed {
                    return Dispatch::Intercepted(reg.interceptor.section());
                }
            }
        }

        match controller.handle_input(event) {
            Some(transition) => Dispatch::Controller(transition),
            None => Dispatch::Ignored,
        }
    }

    /// Reset every interceptor
    pub fn reset_all(&mut self) {
        for reg in self.registrations.iter_mut() {
            reg.interceptor.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Viewport;
    use crate::steps::AboutInterceptor;
    use scls_common::config::{AboutConfig, ScrollConfig};
    use scls_common::events::ViewportMode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls {
        intercepted: AtomicUsize,
        entered: AtomicUsize,
        resets: AtomicUsize,
    }

    impl Calls {
        fn get(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    /// Consumes everything and records what the arbiter called
    struct Greedy {
        section: SectionId,
        calls: Arc<Calls>,
    }

    impl Greedy {
        fn boxed(section: SectionId) -> Box<dyn InputInterceptor> {
            Self::tracked(section).0
        }

        fn tracked(section: SectionId) -> (Box<dyn InputInterceptor>, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let greedy = Greedy {
                section,
                calls: Arc::clone(&calls),
            };
            (Box::new(greedy), calls)
        }
    }

    impl InputInterceptor for Greedy {
        fn section(&self) -> SectionId {
            self.section
        }

        fn intercept(&mut self, _event: &InputEvent, _ctx: &InterceptContext<'_>) -> Interception {
            self.calls.intercepted.fetch_add(1, Ordering::SeqCst);
            Interception::Consumed
        }

        fn on_section_changed(
            &mut self,
            _change: &SectionChange,
            entered: bool,
            _ctx: &InterceptContext<'_>,
        ) {
            if entered {
                self.calls.entered.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn reset(&mut self) {
            self.calls.resets.fetch_add(1, Ordering::SeqCst);
        }

        fn current_step(&self) -> usize {
            0
        }

        fn step_count(&self) -> usize {
            1
        }
    }

    fn setup() -> (InputArbiter, ScrollController) {
        let bus = Arc::new(EventBus::new(64));
        let arbiter = InputArbiter::new(Arc::clone(&bus));
        let controller = ScrollController::new(
            9,
            &ScrollConfig::default(),
            Viewport::new(1440, 900),
            bus,
        )
        .unwrap();
        (arbiter, controller)
    }

    #[test]
    fn test_priority_order() {
        let (mut arbiter, _) = setup();
        let registry = SectionRegistry::landing();
        arbiter.register(0, Greedy::boxed(SectionId::About), &registry);
        arbiter.register(10, Greedy::boxed(SectionId::Services), &registry);
        arbiter.register(0, Greedy::boxed(SectionId::Features), &registry);
        assert_eq!(
            arbiter.dispatch_order(),
            vec![SectionId::Services, SectionId::About, SectionId::Features]
        );
    }

    #[test]
    fn test_controller_is_fallback() {
        let (mut arbiter, mut controller) = setup();
        let (about, calls) = Greedy::tracked(SectionId::About);
        arbiter.register(0, about, &SectionRegistry::landing());

        // Hero is current: the About interceptor is not consulted
        let d = arbiter.dispatch(&InputEvent::wheel(100.0, 0), &mut controller);
        assert!(matches!(d, Dispatch::Controller(t) if t.is_accepted()));
        assert_eq!(controller.current_section(), 1);

        // Still animating into About: controller rejects, interceptor untouched
        let d = arbiter.dispatch(&InputEvent::wheel(100.0, 100), &mut controller);
        assert!(matches!(d, Dispatch::Controller(Transition::Rejected(_))));
        assert_eq!(Calls::get(&calls.intercepted), 0);
        assert_eq!(Calls::get(&calls.entered), 1);

        // Settled on About: interceptor takes precedence
        let d = arbiter.dispatch(&InputEvent::wheel(100.0, 900), &mut controller);
        assert_eq!(d, Dispatch::Intercepted(SectionId::About));
        assert_eq!(controller.current_section(), 1);
        assert_eq!(Calls::get(&calls.intercepted), 1);
    }

    #[test]
    fn test_viewport_mode_change_resets_interceptors() {
        let bus = Arc::new(EventBus::new(64));
        let mut arbiter = InputArbiter::new(Arc::clone(&bus));
        let mut controller = ScrollController::new(
            9,
            &ScrollConfig::default(),
            Viewport::new(1440, 900),
            Arc::clone(&bus),
        )
        .unwrap();
        let registry = SectionRegistry::landing();
        let (hero, calls) = Greedy::tracked(SectionId::Hero);
        arbiter.register(0, hero, &registry);

        arbiter.dispatch(&InputEvent::wheel(100.0, 0), &mut controller);
        assert_eq!(Calls::get(&calls.resets), 0);

        bus.emit_lossy(LandingEvent::ViewportModeChanged {
            mode: ViewportMode::Desktop,
            at: Millis(10),
        });
        arbiter.dispatch(&InputEvent::wheel(100.0, 20), &mut controller);
        assert_eq!(Calls::get(&calls.resets), 1);
    }

    #[test]
    fn test_viewport_mode_change_clears_about_lock() {
        let bus = Arc::new(EventBus::new(64));
        let mut arbiter = InputArbiter::new(Arc::clone(&bus));
        let mut controller = ScrollController::new(
            9,
            &ScrollConfig::default(),
            Viewport::new(1440, 900),
            Arc::clone(&bus),
        )
        .unwrap();
        let about = Box::new(AboutInterceptor::new(&AboutConfig::default()));
        arbiter.register(0, about, &SectionRegistry::landing());

        arbiter.dispatch(&InputEvent::wheel(100.0, 0), &mut controller);
        let d = arbiter.dispatch(&InputEvent::wheel(100.0, 1000), &mut controller);
        assert_eq!(d, Dispatch::Intercepted(SectionId::About));
        let about = |a: &InputArbiter| a.interceptor(SectionId::About).unwrap().current_step();
        assert_eq!(about(&arbiter), 1);

        // Locked until 1800: reverse input is swallowed without stepping
        arbiter.dispatch(&InputEvent::wheel(-100.0, 1100), &mut controller);
        assert_eq!(about(&arbiter), 1);

        bus.emit_lossy(LandingEvent::ViewportModeChanged {
            mode: ViewportMode::Desktop,
            at: Millis(1150),
        });

        // Lock released by the reset: the same input now steps back
        let d = arbiter.dispatch(&InputEvent::wheel(-100.0, 1200), &mut controller);
        assert_eq!(d, Dispatch::Intercepted(SectionId::About));
        assert_eq!(about(&arbiter), 0);
    }

    #[test]
    fn test_missing_section_fails_closed() {
        let (mut arbiter, mut controller) = setup();
        let registry = SectionRegistry::new(vec![SectionId::Hero, SectionId::Contact]).unwrap();
        arbiter.register(0, Greedy::boxed(SectionId::About), &registry);

        for at in [0, 1000, 2000] {
            let d = arbiter.dispatch(&InputEvent::wheel(100.0, at), &mut controller);
            assert_ne!(d, Dispatch::Intercepted(SectionId::About));
        }
    }

    #[test]
    fn test_unhandled_input_is_ignored() {
        let (mut arbiter, mut controller) = setup();
        let d = arbiter.dispatch(
            &InputEvent::TouchStart {
                y: 10.0,
                at: Millis(0),
            },
            &mut controller,
        );
        assert_eq!(d, Dispatch::Ignored);
    }
}
