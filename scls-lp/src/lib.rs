//! # scls-lp
//!
//! Interaction core of the scoliscan landing page:
//! - Full-page scroll controller with a busy-window drop policy
//! - Input arbiter giving section-local interceptors priority over the
//!   controller
//! - About and Services sub-step sections
//! - Spine visualization
//! - Launch notification form and survey modal
//! - Navigation chrome driven by section changes
//!
//! Everything is synchronous and driven by timestamped input, so the whole
//! page can be replayed deterministically from a trace.

pub mod chrome;
pub mod error;
pub mod form;
pub mod input;
pub mod page;
pub mod replay;
pub mod scroll;
pub mod spine;
pub mod steps;

pub use error::{Error, Result};
pub use input::{InputEvent, Key, Viewport};
pub use page::LandingPage;
pub use replay::Trace;
pub use scroll::{Dispatch, Transition};
pub use spine::{render, CurveType, SpineFrame, SpineParams};
