use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::FillSourceError;

// ============================================================================
// Explorer configuration
// ============================================================================

/// Session-level settings for one exploration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Fixed wait after each click before comparing page state
    pub settle_ms: u64,

    /// Where the screenshot for OCR is written
    pub screenshot_path: String,

    /// JSON array of captured snapshots
    pub snapshot_store: String,

    /// Clear the snapshot store when a session starts
    pub reset_store: bool,

    /// JSONL step trace
    pub trace_file: String,

    /// Label/value instructions, `<n>.<label>: <value>` per line
    pub fill_file: String,

    /// Command (program + args) that regenerates `fill_file` before each read
    pub fill_generator: Vec<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            settle_ms: 2500,
            screenshot_path: "page-screenshot.png".to_string(),
            snapshot_store: "ui-extracted.json".to_string(),
            reset_store: true,
            trace_file: "exploration_trace.jsonl".to_string(),
            fill_file: "filled_inputs.txt".to_string(),
            fill_generator: Vec::new(),
        }
    }
}

// ============================================================================
// State machine
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ExplorationState {
    Navigating,
    Extracting,
    Filling,
    Clicking,
    Evaluating,
    Halted(HaltReason),
}

impl ExplorationState {
    pub fn name(&self) -> &'static str {
        match self {
            ExplorationState::Navigating => "navigating",
            ExplorationState::Extracting => "extracting",
            ExplorationState::Filling => "filling",
            ExplorationState::Clicking => "clicking",
            ExplorationState::Evaluating => "evaluating",
            ExplorationState::Halted(_) => "halted",
        }
    }
}

/// Why a session stopped without an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HaltReason {
    /// No unvisited candidate on the page produced a change
    CandidatesExhausted { url: String },
    MissingFillData(String),
    EmptyFillData(String),
    FillDataUnreadable(String),
    FillGeneratorFailed(String),
    StopRequested,
}

impl From<FillSourceError> for HaltReason {
    fn from(err: FillSourceError) -> Self {
        match err {
            FillSourceError::Missing(path) => HaltReason::MissingFillData(path),
            FillSourceError::Empty(path) => HaltReason::EmptyFillData(path),
            e @ FillSourceError::Generator { .. } => HaltReason::FillGeneratorFailed(e.to_string()),
            e @ FillSourceError::Io { .. } => HaltReason::FillDataUnreadable(e.to_string()),
        }
    }
}

/// Operator stop request, checked only between states.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Exploration report
// ============================================================================

/// A click that changed the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub from_url: String,
    pub to_url: String,
    /// Visited key of the clicked element
    pub element: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageVisit {
    pub visits: usize,
    pub fills_applied: usize,
    pub unmatched_labels: Vec<String>,
}

/// What a session did, returned when it halts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExplorationReport {
    pub start_url: String,
    pub pages: HashMap<String, PageVisit>,
    pub transitions: Vec<Transition>,
    pub click_attempts: usize,
    pub click_failures: usize,
    pub halt_reason: Option<HaltReason>,
}

impl ExplorationReport {
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            ..Self::default()
        }
    }

    pub fn page_mut(&mut self, url: &str) -> &mut PageVisit {
        self.pages.entry(url.to_string()).or_default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
