//! Configuration loading and resolution
//!
//! Interaction timings were tuned by feel and are kept as named settings
//! rather than literals scattered through the state machines. Every field
//! has a compiled default, so a missing or partial TOML file still yields a
//! usable configuration.
//!
//! # Resolution priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `SCLS_CONFIG` environment variable
//! 3. `<config_dir>/scoliscan/config.toml`
//! 4. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SCLS_CONFIG";

/// Full landing page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LandingConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub about: AboutConfig,

    #[serde(default)]
    pub services: ServicesConfig,

    #[serde(default)]
    pub spine: SpineConfig,

    #[serde(default)]
    pub survey: SurveyConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Full-page scroll controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Busy window after an accepted transition (ms)
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Viewports narrower than this use native scrolling (px)
    #[serde(default = "default_mobile_breakpoint_px")]
    pub mobile_breakpoint_px: u32,

    /// Minimum vertical swipe distance that changes section (px)
    #[serde(default = "default_min_swipe_px")]
    pub min_swipe_px: f64,
}

/// About section sub-stepping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutConfig {
    /// Lock after each immediate step change (ms)
    #[serde(default = "default_step_lock_ms")]
    pub step_lock_ms: u64,
}

/// Services section wheel accumulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Summed absolute wheel delta required for one step
    #[serde(default = "default_wheel_threshold")]
    pub wheel_threshold: f64,

    /// Idle time after which accumulated delta is forgotten (ms)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

/// Spine visualization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineConfig {
    /// Animation clock step per frame (ms)
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    #[serde(default = "default_severity")]
    pub default_severity: u8,

    #[serde(default = "default_max_severity")]
    pub max_severity: u8,
}

/// External survey shown after sign-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "default_survey_url")]
    pub url: String,
}

/// Event bus sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_transition_ms() -> u64 {
    800
}

fn default_mobile_breakpoint_px() -> u32 {
    1024
}

fn default_min_swipe_px() -> f64 {
    50.0
}

fn default_step_lock_ms() -> u64 {
    800
}

fn default_wheel_threshold() -> f64 {
    400.0
}

fn default_window_ms() -> u64 {
    3000
}

fn default_frame_ms() -> u64 {
    16
}

fn default_severity() -> u8 {
    30
}

fn default_max_severity() -> u8 {
    60
}

fn default_survey_url() -> String {
    "https://docs.google.com/forms/d/e/1FAIpQLSeMIgEobrea7n5JPkTI9xCergIvcTLp-7wu_q8Zb6QIyNJlrw/viewform".to_string()
}

fn default_event_capacity() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            mobile_breakpoint_px: default_mobile_breakpoint_px(),
            min_swipe_px: default_min_swipe_px(),
        }
    }
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            step_lock_ms: default_step_lock_ms(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            wheel_threshold: default_wheel_threshold(),
            window_ms: default_window_ms(),
        }
    }
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            default_severity: default_severity(),
            max_severity: default_max_severity(),
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            url: default_survey_url(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LandingConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LandingConfig = toml::from_str(text)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the state machines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.scroll.transition_ms == 0 {
            return Err(Error::Config(
                "scroll.transition_ms must be greater than zero".to_string(),
            ));
        }
        if self.scroll.mobile_breakpoint_px == 0 {
            return Err(Error::Config(
                "scroll.mobile_breakpoint_px must be greater than zero".to_string(),
            ));
        }
        if !(self.scroll.min_swipe_px >= 0.0) {
            return Err(Error::Config(
                "scroll.min_swipe_px must not be negative".to_string(),
            ));
        }
        if self.about.step_lock_ms == 0 {
            return Err(Error::Config(
                "about.step_lock_ms must be greater than zero".to_string(),
            ));
        }
        if !(self.services.wheel_threshold > 0.0) {
            return Err(Error::Config(
                "services.wheel_threshold must be greater than zero".to_string(),
            ));
        }
        if self.services.window_ms == 0 {
            return Err(Error::Config(
                "services.window_ms must be greater than zero".to_string(),
            ));
        }
        if self.spine.frame_ms == 0 {
            return Err(Error::Config(
                "spine.frame_ms must be greater than zero".to_string(),
            ));
        }
        if self.spine.max_severity == 0 || self.spine.default_severity > self.spine.max_severity {
            return Err(Error::Config(format!(
                "spine.default_severity ({}) must be within 0..={}",
                self.spine.default_severity, self.spine.max_severity
            )));
        }
        if self.events.capacity == 0 {
            return Err(Error::Config(
                "events.capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Config file resolution following the documented priority order
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Locate the config file to use, if any
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        default_config_path().filter(|path| path.exists())
    }

    /// Resolve and load configuration, degrading to compiled defaults
    ///
    /// A missing file logs a warning and yields defaults. A file that exists
    /// but fails to parse or validate is an error.
    pub fn load(&self) -> Result<LandingConfig> {
        let Some(path) = self.resolve_path() else {
            info!("No config file found, using compiled defaults");
            return Ok(LandingConfig::default());
        };

        if !path.exists() {
            warn!(
                "Config file {} does not exist, using compiled defaults",
                path.display()
            );
            return Ok(LandingConfig::default());
        }

        let config = LandingConfig::load(&path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// `<config_dir>/scoliscan/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scoliscan").join("config.toml"))
}

/// Write configuration atomically (temp file + rename)
pub fn write_config(config: &LandingConfig, target: &Path) -> Result<()> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp = target.with_extension("toml.tmp");
    std::fs::write(&temp, text)?;
    std::fs::rename(&temp, target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = LandingConfig::default();
        assert_eq!(config.scroll.transition_ms, 800);
        assert_eq!(config.scroll.mobile_breakpoint_px, 1024);
        assert_eq!(config.scroll.min_swipe_px, 50.0);
        assert_eq!(config.about.step_lock_ms, 800);
        assert_eq!(config.services.wheel_threshold, 400.0);
        assert_eq!(config.services.window_ms, 3000);
        assert_eq!(config.spine.frame_ms, 16);
        assert_eq!(config.spine.default_severity, 30);
        assert_eq!(config.spine.max_severity, 60);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = LandingConfig::from_toml_str(
            r#"
            [services]
            wheel_threshold = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.services.wheel_threshold, 250.0);
        assert_eq!(config.services.window_ms, 3000);
        assert_eq!(config.scroll, ScrollConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            LandingConfig::from_toml_str("").unwrap(),
            LandingConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = LandingConfig::from_toml_str("[scroll]\ntransition_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = LandingConfig::from_toml_str("[services]\nwheel_threshold = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("wheel_threshold"));

        let err = LandingConfig::from_toml_str("[about]\nstep_lock_ms = 0\n").unwrap_err();
        assert!(err.to_string().contains("step_lock_ms"));

        let err =
            LandingConfig::from_toml_str("[spine]\ndefault_severity = 70\n").unwrap_err();
        assert!(err.to_string().contains("default_severity"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = LandingConfig::from_toml_str("[scroll\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
