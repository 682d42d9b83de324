//! Landing page composition root
//!
//! Owns every stateful piece of the page and wires them together through a
//! single `EventBus`. The host UI loop feeds input, clicks, resizes and
//! animation ticks in; observers subscribe to the bus for what changed.

use crate::chrome::{hero_cta, indicator_dots, IndicatorDot, Navigation, ScrollToTop};
use crate::form::{ContactSection, FormError};
use crate::input::{InputEvent, Viewport};
use crate::scroll::{Dispatch, InputArbiter, ScrollController, Transition};
use crate::spine::{render, SpineAnimation, SpineFrame, SpineParams};
use crate::steps::{AboutInterceptor, ServicesInterceptor};
use crate::Result;
use scls_common::config::LandingConfig;
use scls_common::events::{EventBus, LandingEvent, ScrollRequest, ViewportMode};
use scls_common::{Language, Millis, SectionId, SectionRegistry};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Dispatch priority of the About interceptor
pub const ABOUT_PRIORITY: i32 = 10;
/// Dispatch priority of the Services interceptor
pub const SERVICES_PRIORITY: i32 = 10;

pub struct LandingPage {
    config: LandingConfig,
    registry: SectionRegistry,
    bus: Arc<EventBus>,
    controller: ScrollController,
    arbiter: InputArbiter,
    language: Language,
    navigation: Navigation,
    scroll_to_top: ScrollToTop,
    contact: ContactSection,
    spine: SpineParams,
    animation: SpineAnimation,
}

impl LandingPage {
    /// The standard nine-section page
    pub fn new(config: LandingConfig, viewport: Viewport) -> Result<Self> {
        Self::with_registry(config, SectionRegistry::landing(), viewport)
    }

    pub fn with_registry(
        config: LandingConfig,
        registry: SectionRegistry,
        viewport: Viewport,
    ) -> Result<Self> {
        config.validate()?;

        let bus = Arc::new(EventBus::new(config.events.capacity));
        let controller =
            ScrollController::new(registry.len(), &config.scroll, viewport, Arc::clone(&bus))?;

        let mut arbiter = InputArbiter::new(Arc::clone(&bus));
        arbiter.register(
            ABOUT_PRIORITY,
            Box::new(AboutInterceptor::new(&config.about)),
            &registry,
        );
        arbiter.register(
            SERVICES_PRIORITY,
            Box::new(ServicesInterceptor::new(&config.services)),
            &registry,
        );

        let navigation = Navigation::new(registry.clone(), &bus);
        let contact = ContactSection::new(&config.survey);
        let spine = SpineParams::from_config(&config.spine);
        let mut animation = SpineAnimation::new(config.spine.frame_ms);
        animation.start();

        info!(
            "Landing page ready: {} sections, {}x{} viewport, {:?} layout",
            registry.len(),
            viewport.width,
            viewport.height,
            controller.mode()
        );

        Ok(Self {
            config,
            registry,
            bus,
            controller,
            arbiter,
            language: Language::default(),
            navigation,
            scroll_to_top: ScrollToTop,
            contact,
            spine,
            animation,
        })
    }

    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LandingEvent> {
        self.bus.subscribe()
    }

    pub fn current_section(&self) -> usize {
        self.controller.current_section()
    }

    pub fn current_section_id(&self) -> Option<SectionId> {
        self.registry.get(self.controller.current_section())
    }

    pub fn mode(&self) -> ViewportMode {
        self.controller.mode()
    }

    pub fn offset_px(&self) -> f64 {
        self.controller.offset_px()
    }

    pub fn is_busy(&self, now: Millis) -> bool {
        self.controller.is_busy(now)
    }

    /// Current step of a multi-step section
    pub fn sub_step(&self, section: SectionId) -> Option<usize> {
        self.arbiter.interceptor(section).map(|i| i.current_step())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn scroll_to_top(&self) -> &ScrollToTop {
        &self.scroll_to_top
    }

    pub fn contact(&self) -> &ContactSection {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactSection {
        &mut self.contact
    }

    pub fn spine(&self) -> &SpineParams {
        &self.spine
    }

    pub fn spine_mut(&mut self) -> &mut SpineParams {
        &mut self.spine
    }

    /// Route wheel, key or touch input
    pub fn handle_input(&mut self, event: &InputEvent) -> Dispatch {
        let dispatch = self.arbiter.dispatch(event, &mut self.controller);
        self.sync(event.at());
        dispatch
    }

    pub fn request_scroll(&mut self, request: ScrollRequest, now: Millis) -> Transition {
        let transition = self.controller.request(request, now);
        self.sync(now);
        transition
    }

    /// Let timers expire and observers catch up
    pub fn tick(&mut self, now: Millis) {
        self.controller.poll(now);
        self.sync(now);
    }

    pub fn resize(&mut self, viewport: Viewport, now: Millis) -> Option<ViewportMode> {
        let mode = self.controller.resize(viewport, now);
        self.sync(now);
        mode
    }

    /// Switch between Korean and English
    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        info!("Language switched to {}", self.language);
        self.bus.emit_lossy(LandingEvent::LanguageChanged {
            language: self.language,
        });
        self.language
    }

    pub fn click_logo(&mut self, now: Millis) -> Transition {
        let request = self.navigation.logo_click();
        self.request_scroll(request, now)
    }

    pub fn click_nav_cta(&mut self, now: Millis) -> Option<Transition> {
        let request = self.navigation.cta_click()?;
        Some(self.request_scroll(request, now))
    }

    pub fn click_hero_cta(&mut self, now: Millis) -> Option<Transition> {
        let request = hero_cta(&self.registry)?;
        Some(self.request_scroll(request, now))
    }

    pub fn click_scroll_to_top(&mut self, now: Millis) -> Transition {
        let request = self.scroll_to_top.click();
        self.request_scroll(request, now)
    }

    pub fn dots(&self) -> Vec<IndicatorDot> {
        indicator_dots(&self.registry, self.navigation.current_section())
    }

    pub fn click_dot(&mut self, index: usize, now: Millis) -> Transition {
        self.request_scroll(ScrollRequest::to(index), now)
    }

    pub fn submit_contact(&mut self, now: Millis) -> std::result::Result<(), FormError> {
        self.contact.submit(&self.bus, now)
    }

    /// Advance the spine animation one frame
    pub fn next_spine_frame(&mut self) -> Option<SpineFrame> {
        let time = self.animation.tick()?;
        Some(render(&self.spine, time))
    }

    pub fn spine_frame(&self) -> SpineFrame {
        render(&self.spine, self.animation.time_ms())
    }

    /// Stop timers and drop transient interaction state
    pub fn shutdown(&mut self) {
        self.animation.stop();
        self.arbiter.reset_all();
        info!("Landing page shut down");
    }

    fn sync(&mut self, now: Millis) {
        self.arbiter.sync(now);
        self.navigation.sync();
    }
}
