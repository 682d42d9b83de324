//! # Scoliscan Common Library
//!
//! Shared code for the scoliscan crates including:
//! - Landing event types and the EventBus
//! - Section registry
//! - Language context (Korean/English)
//! - Configuration loading
//! - Tracing subscriber setup for the binaries
//! - Millisecond clock used by every state machine

pub mod config;
pub mod error;
pub mod events;
pub mod language;
pub mod logging;
pub mod sections;
pub mod time;

pub use error::{Error, Result};
pub use language::Language;
pub use sections::{SectionId, SectionRegistry};
pub use time::Millis;
