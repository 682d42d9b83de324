//! Scripted input traces
//!
//! A trace is a JSON document describing a viewport and a timeline of
//! input, scroll requests and resizes. Replaying it through a
//! `LandingPage` yields the events the page emitted, in order.

use crate::input::{InputEvent, Viewport};
use crate::page::LandingPage;
use crate::Result;
use scls_common::config::LandingConfig;
use scls_common::events::{drain_pending, LandingEvent, ScrollRequest};
use scls_common::Millis;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedRequest {
    pub section_index: usize,
    pub at: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedResize {
    pub width: u32,
    pub height: u32,
    pub at: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub viewport: Viewport,
    #[serde(default)]
    pub inputs: Vec<InputEvent>,
    #[serde(default)]
    pub requests: Vec<TimedRequest>,
    #[serde(default)]
    pub resizes: Vec<TimedResize>,
}

enum Step {
    Input(InputEvent),
    Request(TimedRequest),
    Resize(TimedResize),
}

impl Step {
    fn at(&self) -> Millis {
        match self {
            Step::Input(event) => event.at(),
            Step::Request(request) => request.at,
            Step::Resize(resize) => resize.at,
        }
    }
}

impl Trace {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| crate::Error::InvalidInput(format!("Invalid trace: {}", e)))
    }

    /// Build a page for this trace and replay it
    pub fn run(&self, config: LandingConfig) -> Result<Vec<LandingEvent>> {
        let mut page = LandingPage::new(config, self.viewport)?;
        Ok(self.replay(&mut page))
    }

    /// Apply the timeline in timestamp order
    ///
    /// Entries sharing a timestamp run resizes first, then requests, then
    /// input.
    pub fn replay(&self, page: &mut LandingPage) -> Vec<LandingEvent> {
        let mut rx = page.subscribe();

        let mut steps: Vec<Step> = self
            .resizes
            .iter()
            .copied()
            .map(Step::Resize)
            .chain(self.requests.iter().copied().map(Step::Request))
            .chain(self.inputs.iter().copied().map(Step::Input))
            .collect();
        steps.sort_by_key(Step::at);

        let mut events = Vec::new();
        let mut last = Millis::ZERO;
        for step in &steps {
            last = step.at();
            match step {
                Step::Input(event) => {
                    let dispatch = page.handle_input(event);
                    debug!("{:?} -> {:?}", event, dispatch);
                }
                Step::Request(request) => {
                    page.request_scroll(ScrollRequest::to(request.section_index), request.at);
                }
                Step::Resize(resize) => {
                    page.resize(Viewport::new(resize.width, resize.height), resize.at);
                }
            }
            // Bounded channel: drain after every step
            events.extend(drain_pending(&mut rx));
        }
        page.tick(last);
        events.extend(drain_pending(&mut rx));

        events
    }
}
