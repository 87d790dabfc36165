use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::browser::driver::BrowserDriver;
use crate::browser::playwright::{CANDIDATE_SELECTOR, FILL_SELECTOR};
use crate::error::ExplorerError;
use crate::screen::ocr::{OcrEngine, OcrResult};
use crate::screen::screen_model::PageSnapshot;
use crate::screen::store::SnapshotStore;

/// Builds a `PageSnapshot` from a screenshot OCR pass plus DOM enumeration.
///
/// OCR problems (screenshot or recognition) never fail a capture: the snapshot
/// is produced with no tokens and matching falls back to DOM attributes.
/// Element enumeration errors are driver-fatal and propagate.
pub struct PageSnapshotProvider {
    ocr: Box<dyn OcrEngine>,
    screenshot_path: String,
    store: Option<SnapshotStore>,
}

impl PageSnapshotProvider {
    pub fn new(ocr: Box<dyn OcrEngine>, screenshot_path: &str) -> Self {
        Self {
            ocr,
            screenshot_path: screenshot_path.to_string(),
            store: None,
        }
    }

    /// Also append every capture to a snapshot store.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store(&self) -> Option<&SnapshotStore> {
        self.store.as_ref()
    }

    pub fn capture(
        &self,
        driver: &mut dyn BrowserDriver,
        url: &str,
    ) -> Result<PageSnapshot, ExplorerError> {
        let ocr = self.recognize(driver);

        let elements = driver.get_elements(FILL_SELECTOR)?;
        let candidates = driver.get_elements(CANDIDATE_SELECTOR)?;

        let snapshot = PageSnapshot {
            url: url.to_string(),
            captured_at: now_ms(),
            text_blocks: ocr.text_blocks(),
            ocr_tokens: ocr.into_tokens(),
            elements,
            candidates,
        };

        info!(
            url,
            tokens = snapshot.ocr_tokens.len(),
            elements = snapshot.elements.len(),
            candidates = snapshot.candidates.len(),
            "captured page snapshot"
        );

        if let Some(store) = &self.store {
            if let Err(e) = store.append(&snapshot) {
                warn!(error = %e, "could not persist snapshot");
            }
        }

        Ok(snapshot)
    }

    fn recognize(&self, driver: &mut dyn BrowserDriver) -> OcrResult {
        if let Err(e) = driver.screenshot(&self.screenshot_path) {
            warn!(error = %e, "screenshot failed, continuing without OCR");
            return OcrResult::default();
        }

        match self.ocr.recognize(Path::new(&self.screenshot_path)) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "OCR failed, continuing with structural data only");
                OcrResult::default()
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
