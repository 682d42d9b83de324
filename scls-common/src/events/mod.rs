//! Event types for the landing page event system
//!
//! Provides the shared event definitions and the EventBus every component
//! uses to signal across the page. The bus is owned by the composition root
//! and handed to producers explicitly; consumers hold their own receiver.

mod section_types;

pub use section_types::{Direction, ScrollRequest, SectionChange, ViewportMode};

use crate::language::Language;
use crate::sections::SectionId;
use crate::time::Millis;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

/// Landing page event types
///
/// Events are broadcast via EventBus and can be serialized (for trace
/// replay output and logging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LandingEvent {
    /// The full-page view moved to another section
    ///
    /// Triggers:
    /// - Navigation: logo and button theme
    /// - Indicator dots: active dot
    /// - Services: entry-direction step seeding
    SectionChanged {
        /// Index of the section now showing
        section_index: usize,
        /// Index before the change
        previous_section: Option<usize>,
        /// Direction of travel
        direction: Option<Direction>,
        /// When the transition was accepted
        at: Millis,
    },

    /// A multi-step section moved to another internal step
    SubStepChanged {
        section: SectionId,
        step: usize,
        at: Millis,
    },

    /// Viewport crossed the mobile breakpoint
    ViewportModeChanged { mode: ViewportMode, at: Millis },

    /// UI language switched
    LanguageChanged { language: Language },

    /// Follow-up survey modal shown after a successful sign-up
    SurveyModalOpened { at: Millis },

    /// Survey modal closed
    SurveyModalClosed {
        /// True when closed by following the survey link
        survey_opened: bool,
        at: Millis,
    },
}

impl LandingEvent {
    /// Section change payload, if this is a section change
    pub fn as_section_change(&self) -> Option<SectionChange> {
        match self {
            LandingEvent::SectionChanged {
                section_index,
                previous_section,
                direction,
                ..
            } => Some(SectionChange {
                section_index: *section_index,
                previous_section: *previous_section,
                direction: *direction,
            }),
            _ => None,
        }
    }

    /// Event type name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            LandingEvent::SectionChanged { .. } => "SectionChanged",
            LandingEvent::SubStepChanged { .. } => "SubStepChanged",
            LandingEvent::ViewportModeChanged { .. } => "ViewportModeChanged",
            LandingEvent::LanguageChanged { .. } => "LanguageChanged",
            LandingEvent::SurveyModalOpened { .. } => "SurveyModalOpened",
            LandingEvent::SurveyModalClosed { .. } => "SurveyModalClosed",
        }
    }
}

/// Central event distribution bus
///
/// Wraps a tokio broadcast channel. Sending never blocks, so producers can
/// emit from inside synchronous input handlers.
pub struct EventBus {
    tx: broadcast::Sender<LandingEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before the slowest receiver
    ///   starts losing the oldest ones
    ///
    /// # Examples
    ///
    /// ```
    /// use scls_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(64);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LandingEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    ///
    /// # Examples
    ///
    /// ```
    /// use scls_common::events::{EventBus, LandingEvent};
    /// use scls_common::Language;
    ///
    /// let event_bus = EventBus::new(16);
    /// let _rx = event_bus.subscribe();
    ///
    /// let sent = event_bus.emit(LandingEvent::LanguageChanged { language: Language::En });
    /// assert_eq!(sent.unwrap(), 1);
    /// ```
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: LandingEvent,
    ) -> Result<usize, broadcast::error::SendError<LandingEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: LandingEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Drain every event currently queued for `rx` without waiting
///
/// Used by consumers living in the single-threaded UI loop. A lagged
/// receiver skips what it missed and keeps going; only the latest state
/// matters to them.
pub fn drain_pending(rx: &mut broadcast::Receiver<LandingEvent>) -> Vec<LandingEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Event receiver lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }
    events
}
