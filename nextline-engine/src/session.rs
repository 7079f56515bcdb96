use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitStage {
    Done,
    Failed,
}

impl SubmitStage {
    // A stable string label for UI display.
    pub fn label(self) -> &'static str {
        match self {
            SubmitStage::Done => "done",
            SubmitStage::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTimings {
    pub first_fragment_ms: Option<u64>,
    pub total_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub stage: SubmitStage,
    /// Text left on display once the flow ended.
    pub response: String,
    pub fragments: usize,
    pub timings: SubmitTimings,
    /// Underlying failure, for logs only; the form shows the fallback text.
    pub error: Option<String>,
}

impl SubmitOutcome {
    pub fn done(response: String, fragments: usize, timings: SubmitTimings) -> Self {
        Self {
            stage: SubmitStage::Done,
            response,
            fragments,
            timings,
            error: None,
        }
    }

    pub fn failed(
        response: String,
        fragments: usize,
        timings: SubmitTimings,
        error: impl Into<String>,
    ) -> Self {
        Self {
            stage: SubmitStage::Failed,
            response,
            fragments,
            timings,
            error: Some(error.into()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage == SubmitStage::Done
    }
}

pub fn ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
