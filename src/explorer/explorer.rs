use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::browser::driver::BrowserDriver;
use crate::browser::playwright::ElementRef;
use crate::error::ExplorerError;
use crate::matching::fill_data::{FillSource, LabelValuePair};
use crate::matching::label_matcher::LabelMatcher;
use crate::scoring::element_scorer::{ElementScore, ElementScorer};
use crate::screen::provider::PageSnapshotProvider;
use crate::screen::screen_model::PageSnapshot;
use crate::state::diff::{ChangeDetector, StateProbe};
use crate::state::visited::VisitedSetTracker;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

use super::app_map::{
    ExplorationReport, ExplorationState, HaltReason, StopSignal, Transition,
};

/// Offset of the coordinate fallback click from the box's top-left corner.
const FALLBACK_CLICK_OFFSET: f64 = 2.0;

/// A click issued and awaiting evaluation.
struct PendingClick {
    candidate: ElementScore,
    before: StateProbe,
}

/// Everything the controller knows about the page it is on.
#[derive(Default)]
struct PageContext {
    url: String,
    snapshot: Option<PageSnapshot>,
    fill_data: Vec<LabelValuePair>,
    /// Unvisited candidates, best first. `None` until ranked for this snapshot.
    queue: Option<VecDeque<ElementScore>>,
    pending: Option<PendingClick>,
}

/// Drives navigate → extract → fill → click → evaluate until no unvisited
/// candidate changes the page.
///
/// Owns the session's visited sets; nothing outside the controller writes
/// them. Every driver call completes before the next one is issued.
pub struct ExplorationController {
    provider: PageSnapshotProvider,
    fill_source: Box<dyn FillSource>,
    matcher: LabelMatcher,
    scorer: ElementScorer,
    detector: ChangeDetector,
    visited: VisitedSetTracker,
    tracer: TraceLogger,
    stop: StopSignal,
    step: u64,
    state_name: &'static str,
    page: PageContext,
}

impl ExplorationController {
    pub fn new(
        provider: PageSnapshotProvider,
        fill_source: Box<dyn FillSource>,
        matcher: LabelMatcher,
        scorer: ElementScorer,
        detector: ChangeDetector,
    ) -> Self {
        Self {
            provider,
            fill_source,
            matcher,
            scorer,
            detector,
            visited: VisitedSetTracker::new(),
            tracer: TraceLogger::disabled(),
            stop: StopSignal::new(),
            step: 0,
            state_name: "navigating",
            page: PageContext::default(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn visited(&self) -> &VisitedSetTracker {
        &self.visited
    }

    pub fn current_url(&self) -> &str {
        &self.page.url
    }

    /// Explore from `start_url` until `Halted`.
    ///
    /// Driver-fatal errors (navigation, element enumeration, page probes)
    /// end the session with `Err`; everything else ends in a `HaltReason`.
    pub fn run(
        &mut self,
        driver: &mut dyn BrowserDriver,
        start_url: &str,
    ) -> Result<ExplorationReport, ExplorerError> {
        let mut report = ExplorationReport::new(start_url);
        self.page = PageContext {
            url: start_url.to_string(),
            ..PageContext::default()
        };

        let mut state = ExplorationState::Navigating;
        loop {
            if let ExplorationState::Halted(reason) = &state {
                info!(?reason, clicks = report.click_attempts, "exploration halted");
                report.halt_reason = Some(reason.clone());
                return Ok(report);
            }

            if self.stop.is_requested() {
                state = ExplorationState::Halted(HaltReason::StopRequested);
                continue;
            }

            state = self.step(driver, state, &mut report)?;
        }
    }

    /// Execute one state and return the next.
    pub fn step(
        &mut self,
        driver: &mut dyn BrowserDriver,
        state: ExplorationState,
        report: &mut ExplorationReport,
    ) -> Result<ExplorationState, ExplorerError> {
        self.state_name = state.name();
        self.step += 1;
        debug!(state = state.name(), url = %self.page.url, "step");

        let next = match state {
            ExplorationState::Navigating => self.navigate(driver, report)?,
            ExplorationState::Extracting => self.extract(driver)?,
            ExplorationState::Filling => self.fill(driver, report),
            ExplorationState::Clicking => self.click_next(driver, report)?,
            ExplorationState::Evaluating => self.evaluate(driver, report)?,
            halted @ ExplorationState::Halted(_) => halted,
        };

        Ok(next)
    }

    fn navigate(
        &mut self,
        driver: &mut dyn BrowserDriver,
        report: &mut ExplorationReport,
    ) -> Result<ExplorationState, ExplorerError> {
        let url = self.page.url.clone();
        info!(url = %url, "navigating");
        driver.navigate(&url)?;

        report.page_mut(&url).visits += 1;
        self.page.snapshot = None;
        self.page.queue = None;
        self.page.pending = None;

        self.trace("navigated", None);
        Ok(ExplorationState::Extracting)
    }

    fn extract(&mut self, driver: &mut dyn BrowserDriver) -> Result<ExplorationState, ExplorerError> {
        let snapshot = self.provider.capture(driver, &self.page.url)?;
        if snapshot.is_degraded() {
            warn!(url = %self.page.url, "no OCR tokens, label matching uses DOM attributes only");
        }
        self.page.snapshot = Some(snapshot);

        match self.fill_source.load() {
            Ok(pairs) => {
                self.page.fill_data = pairs;
                self.trace("extracted", None);
                Ok(ExplorationState::Filling)
            }
            Err(e) => {
                warn!(error = %e, "fill instructions unavailable");
                self.trace("fill_data_unavailable", Some(e.to_string()));
                Ok(ExplorationState::Halted(e.into()))
            }
        }
    }

    fn fill(&mut self, driver: &mut dyn BrowserDriver, report: &mut ExplorationReport) -> ExplorationState {
        let Some(snapshot) = &self.page.snapshot else {
            return ExplorationState::Clicking;
        };

        let matches = self.matcher.assign(&self.page.fill_data, snapshot);
        let mut applied = 0;

        for assignment in &matches.assignments {
            let target = ElementRef::for_element(&assignment.element);
            info!(
                label = %assignment.label,
                element = %assignment.element.describe(),
                "filling"
            );
            match driver.fill(&target, &assignment.value) {
                Ok(()) => applied += 1,
                Err(e) => warn!(label = %assignment.label, error = %e, "fill failed, skipping"),
            }
        }

        let page = report.page_mut(&self.page.url);
        page.fills_applied += applied;
        for label in matches.unmatched {
            if !page.unmatched_labels.contains(&label) {
                page.unmatched_labels.push(label);
            }
        }

        self.trace("filled", Some(format!("{} of {} assigned", applied, self.page.fill_data.len())));
        ExplorationState::Clicking
    }

    /// Unvisited candidates of the current snapshot, best first.
    pub fn rank_candidates(&self, snapshot: &PageSnapshot) -> Vec<ElementScore> {
        self.scorer
            .rank(&snapshot.candidates)
            .into_iter()
            .filter(|c| self.visited.is_new(&self.page.url, &c.identity_key))
            .collect()
    }

    fn click_next(
        &mut self,
        driver: &mut dyn BrowserDriver,
        report: &mut ExplorationReport,
    ) -> Result<ExplorationState, ExplorerError> {
        if self.page.queue.is_none() {
            let ranked = self
                .page
                .snapshot
                .as_ref()
                .map(|s| self.rank_candidates(s))
                .unwrap_or_default();
            debug!(count = ranked.len(), "ranked click candidates");
            self.page.queue = Some(ranked.into());
        }

        let url = self.page.url.clone();
        let candidate = loop {
            let next = self.page.queue.as_mut().and_then(VecDeque::pop_front);
            match next {
                // Several nodes may share a key; only the first is attempted
                Some(c) if !self.visited.is_new(&url, &c.identity_key) => continue,
                Some(c) => break c,
                None => {
                    info!(url = %url, "no unvisited candidate left");
                    self.trace("exhausted", None);
                    return Ok(ExplorationState::Halted(HaltReason::CandidatesExhausted {
                        url,
                    }));
                }
            }
        };

        // Recorded before the outcome is known so a candidate is never retried
        self.visited.mark_visited(&url, candidate.identity_key.clone());
        report.click_attempts += 1;

        let before = self.detector.probe(driver)?;

        info!(
            element = %candidate.element.describe(),
            key = %candidate.identity_key,
            score = candidate.score,
            "clicking"
        );
        let trace = self
            .event()
            .with_candidate(&candidate.identity_key, candidate.score);

        if let Err(e) = click_with_fallback(driver, &candidate) {
            warn!(key = %candidate.identity_key, error = %e, "click failed, trying next candidate");
            report.click_failures += 1;
            self.tracer.log(&trace.with_decision("click_failed").with_detail(e));
            return Ok(ExplorationState::Clicking);
        }

        self.tracer.log(&trace.with_decision("clicked"));
        self.page.pending = Some(PendingClick { candidate, before });
        Ok(ExplorationState::Evaluating)
    }

    fn evaluate(
        &mut self,
        driver: &mut dyn BrowserDriver,
        report: &mut ExplorationReport,
    ) -> Result<ExplorationState, ExplorerError> {
        let Some(pending) = self.page.pending.take() else {
            return Ok(ExplorationState::Clicking);
        };

        let after = self.detector.settle_and_probe(driver)?;

        if !self.detector.changed(&pending.before, &after) {
            debug!(key = %pending.candidate.identity_key, "no observable change");
            self.trace("unchanged", None);
            return Ok(ExplorationState::Clicking);
        }

        info!(from = %pending.before.url, to = %after.url, "page changed");
        report.transitions.push(Transition {
            from_url: pending.before.url.clone(),
            to_url: after.url.clone(),
            element: pending.candidate.identity_key.as_str().to_string(),
            score: pending.candidate.score,
        });
        self.trace("changed", Some(after.url.clone()));

        self.page.url = after.url;
        Ok(ExplorationState::Navigating)
    }

    fn event(&self) -> TraceEvent {
        TraceEvent::now(self.step.saturating_sub(1), self.state_name).with_url(&self.page.url)
    }

    fn trace(&self, decision: &str, detail: Option<String>) {
        let mut event = self.event().with_decision(decision);
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.tracer.log(&event);
    }
}

/// Click by element handle, then by coordinates just inside the box.
fn click_with_fallback(
    driver: &mut dyn BrowserDriver,
    candidate: &ElementScore,
) -> Result<(), ExplorerError> {
    let target = ElementRef::for_element(&candidate.element);
    match driver.click(&target) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(error = %e, "element click failed, falling back to coordinates");
            let b = &candidate.element.bounding_box;
            driver.click_at(b.x + FALLBACK_CLICK_OFFSET, b.y + FALLBACK_CLICK_OFFSET)
        }
    }
}
