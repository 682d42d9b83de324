//! Page chrome that follows the current section
//!
//! Navigation bar, indicator dots, scroll-to-top button and the hero call to
//! action. None of these move the page themselves: they produce
//! `ScrollRequest`s for the controller and learn the current section from
//! `SectionChanged` notifications.

use scls_common::events::{drain_pending, EventBus, LandingEvent, ScrollRequest};
use scls_common::language::Localized;
use scls_common::{Language, SectionId, SectionRegistry};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Logo artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoVariant {
    /// White logo for dark or photographic backgrounds
    Light,
    /// Dark logo for white panels
    Dark,
}

impl LogoVariant {
    pub fn asset(&self) -> &'static str {
        match self {
            LogoVariant::Light => "/images/logo.svg",
            LogoVariant::Dark => "/images/logo-b.svg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    White,
    Primary,
}

/// Navigation styling for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTheme {
    pub logo: LogoVariant,
    pub button: ButtonVariant,
}

/// Dark logo and primary button over Features through Services
pub fn nav_theme(section: Option<SectionId>) -> NavTheme {
    let dark = section.map_or(false, |id| {
        id != SectionId::About && id.has_light_background()
    });
    if dark {
        NavTheme {
            logo: LogoVariant::Dark,
            button: ButtonVariant::Primary,
        }
    } else {
        NavTheme {
            logo: LogoVariant::Light,
            button: ButtonVariant::White,
        }
    }
}

const CTA_LABEL: Localized<&str> = Localized::new("출시 알림 받기", "Get Launch Notifications");
const CTA_LABEL_SHORT: Localized<&str> = Localized::new("알림받기", "Notify");

/// Top navigation bar
pub struct Navigation {
    registry: SectionRegistry,
    current: usize,
    rx: broadcast::Receiver<LandingEvent>,
}

impl Navigation {
    pub fn new(registry: SectionRegistry, bus: &EventBus) -> Self {
        Self {
            registry,
            current: 0,
            rx: bus.subscribe(),
        }
    }

    /// Catch up with section changes
    pub fn sync(&mut self) {
        for event in drain_pending(&mut self.rx) {
            match event {
                LandingEvent::SectionChanged { section_index, .. } => {
                    trace!("Navigation follows section {}", section_index);
                    self.current = section_index;
                }
                // Mobile and desktop layouts both start from the top
                LandingEvent::ViewportModeChanged { .. } => self.current = 0,
                _ => {}
            }
        }
    }

    pub fn current_section(&self) -> usize {
        self.current
    }

    pub fn theme(&self) -> NavTheme {
        nav_theme(self.registry.get(self.current))
    }

    pub fn logo_click(&self) -> ScrollRequest {
        ScrollRequest::to(0)
    }

    /// Launch notification button; `None` if the page has no contact form
    pub fn cta_click(&self) -> Option<ScrollRequest> {
        self.registry
            .index_of(SectionId::Contact)
            .map(ScrollRequest::to)
    }

    pub fn cta_label(&self, language: Language, compact: bool) -> &'static str {
        if compact {
            *CTA_LABEL_SHORT.get(language)
        } else {
            *CTA_LABEL.get(language)
        }
    }

    pub fn language_badge(&self, language: Language) -> &'static str {
        language.badge()
    }
}

/// Floating button returning to the hero
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollToTop;

impl ScrollToTop {
    /// Shown on every section, the hero included
    pub fn is_visible(&self) -> bool {
        true
    }

    pub fn click(&self) -> ScrollRequest {
        ScrollRequest::to(0)
    }
}

/// Hero call to action jumps straight to the sign-up form
pub fn hero_cta(registry: &SectionRegistry) -> Option<ScrollRequest> {
    registry.index_of(SectionId::Contact).map(ScrollRequest::to)
}

/// Indicator dot appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotStyle {
    Active,
    /// Inactive, drawn for a white panel
    OutlineOnLight,
    /// Inactive, drawn for a dark panel
    OutlineOnDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDot {
    pub index: usize,
    pub section: SectionId,
    pub style: DotStyle,
}

impl IndicatorDot {
    pub fn click(&self) -> ScrollRequest {
        ScrollRequest::to(self.index)
    }
}

/// One dot per section, styled for the current one
pub fn indicator_dots(registry: &SectionRegistry, current: usize) -> Vec<IndicatorDot> {
    let on_light = registry
        .get(current)
        .map_or(false, |id| id.has_light_background());
    let inactive = if on_light {
        DotStyle::OutlineOnLight
    } else {
        DotStyle::OutlineOnDark
    };

    registry
        .iter()
        .enumerate()
        .map(|(index, section)| IndicatorDot {
            index,
            section,
            style: if index == current {
                DotStyle::Active
            } else {
                inactive
            },
        })
        .collect()
}
