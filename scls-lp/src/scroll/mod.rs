//! Full-page scrolling: controller, input arbiter, gesture accumulation

mod accumulator;
mod arbiter;
mod controller;

pub use accumulator::GestureAccumulator;
pub use arbiter::{Dispatch, InputArbiter, InputInterceptor, InterceptContext, Interception};
pub use controller::{Rejection, ScrollController, Transition};
