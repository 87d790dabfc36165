use serde::Serialize;

use crate::browser::driver::BrowserDriver;
use crate::error::ExplorerError;
use crate::state::normalize::content_signature;

/// What the page looked like at one instant, reduced to what change
/// detection compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateProbe {
    pub url: String,
    pub content_signature: String,
}

impl StateProbe {
    pub fn new(url: &str, content: &str) -> Self {
        Self {
            url: url.to_string(),
            content_signature: content_signature(content),
        }
    }
}

/// Decides whether an action had an observable effect.
///
/// Two phases: probe before the action, then `settle` (a fixed wait through
/// the driver) and probe again. A change that renders after the settle window
/// is missed; the caller just tries its next candidate.
pub struct ChangeDetector {
    pub settle_ms: u64,
}

impl ChangeDetector {
    pub fn new(settle_ms: u64) -> Self {
        Self { settle_ms }
    }

    pub fn probe(&self, driver: &mut dyn BrowserDriver) -> Result<StateProbe, ExplorerError> {
        let url = driver.current_url()?;
        let content = driver.serialized_content()?;
        Ok(StateProbe::new(&url, &content))
    }

    /// Wait out the settle window, then probe.
    pub fn settle_and_probe(
        &self,
        driver: &mut dyn BrowserDriver,
    ) -> Result<StateProbe, ExplorerError> {
        driver.wait(self.settle_ms)?;
        self.probe(driver)
    }

    pub fn changed(&self, before: &StateProbe, after: &StateProbe) -> bool {
        changed(before, after)
    }
}

pub fn changed(before: &StateProbe, after: &StateProbe) -> bool {
    before.url != after.url || before.content_signature != after.content_signature
}
