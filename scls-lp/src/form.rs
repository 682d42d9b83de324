//! Launch notification sign-up and the follow-up survey modal
//!
//! Validation is client-side only; nothing is submitted anywhere. A valid
//! sign-up opens a modal inviting the visitor to an external survey.

use scls_common::config::SurveyConfig;
use scls_common::events::{EventBus, LandingEvent};
use scls_common::language::Localized;
use scls_common::{Language, Millis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Who the visitor is signing up for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Child,
    #[serde(rename = "self")]
    Myself,
    Family,
}

impl Audience {
    pub fn label(&self, language: Language) -> &'static str {
        let label = match self {
            Audience::Child => Localized::new("자녀", "Child"),
            Audience::Myself => Localized::new("본인", "Self"),
            Audience::Family => Localized::new("다른 가족들", "Other Family Members"),
        };
        *label.get(language)
    }
}

/// Reasons a sign-up is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("consent to notifications is required")]
    ConsentRequired,

    #[error("email address is required")]
    EmailRequired,
}

impl FormError {
    /// Message shown to the visitor
    pub fn message(&self, language: Language) -> &'static str {
        let message = match self {
            FormError::ConsentRequired => Localized::new(
                "알림 및 서비스 정보 수신에 동의해주세요.",
                "Please agree to receive notifications and service information.",
            ),
            FormError::EmailRequired => {
                Localized::new("이메일을 입력해주세요.", "Please enter your email.")
            }
        };
        *message.get(language)
    }
}

/// Sign-up form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationForm {
    pub email: String,
    pub audience: Audience,
    pub consent: bool,
}

impl NotificationForm {
    /// Check consent first, then a non-blank email
    pub fn validate(&self) -> std::result::Result<(), FormError> {
        if !self.consent {
            return Err(FormError::ConsentRequired);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::EmailRequired);
        }
        Ok(())
    }
}

/// Follow-up survey invitation
#[derive(Debug, Clone)]
pub struct SurveyModal {
    open: bool,
    url: String,
}

impl SurveyModal {
    pub fn new(config: &SurveyConfig) -> Self {
        Self {
            open: false,
            url: config.url.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Show the modal; returns false if it was already showing
    pub fn open(&mut self, bus: &EventBus, now: Millis) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        bus.emit_lossy(LandingEvent::SurveyModalOpened { at: now });
        true
    }

    /// Close without visiting the survey
    pub fn dismiss(&mut self, bus: &EventBus, now: Millis) {
        self.close(false, bus, now);
    }

    /// Close and hand back the survey URL to open in a new window
    pub fn take_survey(&mut self, bus: &EventBus, now: Millis) -> Option<&str> {
        if !self.open {
            return None;
        }
        self.close(true, bus, now);
        Some(&self.url)
    }

    fn close(&mut self, survey_opened: bool, bus: &EventBus, now: Millis) {
        if !self.open {
            return;
        }
        self.open = false;
        debug!("Survey modal closed (survey opened: {})", survey_opened);
        bus.emit_lossy(LandingEvent::SurveyModalClosed { survey_opened, at: now });
    }
}

/// Contact section: the form plus its modal
#[derive(Debug, Clone)]
pub struct ContactSection {
    pub form: NotificationForm,
    modal: SurveyModal,
}

impl ContactSection {
    pub fn new(config: &SurveyConfig) -> Self {
        Self {
            form: NotificationForm::default(),
            modal: SurveyModal::new(config),
        }
    }

    pub fn modal(&self) -> &SurveyModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut SurveyModal {
        &mut self.modal
    }

    /// Validate the form and show the survey modal on success
    pub fn submit(&mut self, bus: &EventBus, now: Millis) -> std::result::Result<(), FormError> {
        if let Err(e) = self.form.validate() {
            debug!("Sign-up rejected: {}", e);
            return Err(e);
        }
        info!("Sign-up accepted ({:?})", self.form.audience);
        self.modal.open(bus, now);
        Ok(())
    }
}
