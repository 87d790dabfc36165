use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the exploration trace: what a state did on one step.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub state: String,
    pub url: Option<String>,

    pub candidate: Option<String>,
    pub score: Option<f64>,

    pub decision: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            state: state.to_string(),
            url: None,
            candidate: None,
            score: None,
            decision: None,
            detail: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_candidate(mut self, key: impl ToString, score: f64) -> Self {
        self.candidate = Some(key.to_string());
        self.score = Some(score);
        self
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
