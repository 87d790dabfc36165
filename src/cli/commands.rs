use std::io::{BufRead, BufReader};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use crate::browser::session::BrowserSession;
use crate::cli::config::AppConfig;
use crate::explorer::app_map::{ExplorationReport, StopSignal};
use crate::explorer::explorer::ExplorationController;
use crate::matching::fill_data::FileFillSource;
use crate::matching::label_matcher::LabelMatcher;
use crate::scoring::element_scorer::ElementScorer;
use crate::screen::ocr::{HttpOcrEngine, NullOcrEngine, OcrEngine};
use crate::screen::provider::PageSnapshotProvider;
use crate::screen::store::SnapshotStore;
use crate::state::diff::ChangeDetector;
use crate::trace::logger::TraceLogger;

// ============================================================================
// explore
// ============================================================================

/// Launch a browser, explore from `url` until halted, print a summary.
pub fn cmd_explore(url: &str, config: &AppConfig) -> Result<ExplorationReport, Box<dyn std::error::Error>> {
    let mut controller = build_controller(config);
    watch_stdin_for_stop(controller.stop_signal());

    let mut session =
        BrowserSession::launch(&config.browser.server_script, config.browser.type_delay_ms)?;

    info!(url, "starting exploration (press Enter to stop)");
    let result = controller.run(&mut session, url);
    session.quit()?;
    let report = result?;

    println!("{}", format_summary(&report));
    Ok(report)
}

/// Wire every engine component from the config.
pub fn build_controller(config: &AppConfig) -> ExplorationController {
    let explore = &config.explore;

    let ocr: Box<dyn OcrEngine> = match &config.ocr.endpoint {
        Some(endpoint) => Box::new(HttpOcrEngine::new(endpoint, config.ocr.timeout_secs)),
        None => Box::new(NullOcrEngine),
    };

    let store = SnapshotStore::new(&explore.snapshot_store);
    if explore.reset_store {
        if let Err(e) = store.reset() {
            warn!(error = %e, "could not reset snapshot store");
        }
    }
    let provider = PageSnapshotProvider::new(ocr, &explore.screenshot_path).with_store(store);

    let fill_source =
        FileFillSource::new(&explore.fill_file).with_generator(explore.fill_generator.clone());

    ExplorationController::new(
        provider,
        Box::new(fill_source),
        LabelMatcher::new(config.matching.clone()),
        ElementScorer::new(config.scoring.clone()),
        ChangeDetector::new(explore.settle_ms),
    )
    .with_tracer(TraceLogger::new(&explore.trace_file))
}

/// Operator stop: any line on stdin requests a halt at the next state boundary.
fn watch_stdin_for_stop(stop: StopSignal) {
    watch_for_stop(BufReader::new(std::io::stdin()), stop);
}

/// Request a stop once a line arrives on `input`. EOF (no terminal attached)
/// and read errors leave the session running.
pub fn watch_for_stop<R>(mut input: R, stop: StopSignal) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(n) if n > 0 => {
                info!("stop requested by operator");
                stop.request_stop();
            }
            Ok(_) => debug!("stdin closed, operator stop unavailable"),
            Err(e) => warn!(error = %e, "could not read stdin, operator stop unavailable"),
        }
    })
}

pub fn format_summary(report: &ExplorationReport) -> String {
    let mut out = format!(
        "Explored {} pages, {} transitions, {} click attempts ({} failed)\n",
        report.page_count(),
        report.transitions.len(),
        report.click_attempts,
        report.click_failures
    );

    let mut urls: Vec<_> = report.pages.keys().collect();
    urls.sort();
    for url in urls {
        let page = &report.pages[url];
        out.push_str(&format!(
            "  {} (visits={}, fills={})\n",
            url, page.visits, page.fills_applied
        ));
        if !page.unmatched_labels.is_empty() {
            out.push_str(&format!("    unmatched: {}\n", page.unmatched_labels.join(", ")));
        }
    }

    for t in &report.transitions {
        out.push_str(&format!("  {} -> {} via {}\n", t.from_url, t.to_url, t.element));
    }

    if let Some(reason) = &report.halt_reason {
        out.push_str(&format!("Halted: {:?}\n", reason));
    }
    out
}
