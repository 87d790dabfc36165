use crate::browser::playwright::ElementRef;
use crate::error::ExplorerError;
use crate::screen::screen_model::ElementDescriptor;

/// Browser operations the explorer consumes.
///
/// Calls are blocking and strictly sequential; the explorer never issues a
/// second call before the previous one returned.
pub trait BrowserDriver {
    fn navigate(&mut self, url: &str) -> Result<(), ExplorerError>;

    /// Enumerate elements matching a CSS selector with live geometry.
    fn get_elements(&mut self, selector: &str) -> Result<Vec<ElementDescriptor>, ExplorerError>;

    fn fill(&mut self, target: &ElementRef, value: &str) -> Result<(), ExplorerError>;

    fn click(&mut self, target: &ElementRef) -> Result<(), ExplorerError>;

    fn click_at(&mut self, x: f64, y: f64) -> Result<(), ExplorerError>;

    fn current_url(&mut self) -> Result<String, ExplorerError>;

    /// Full serialized page content (outer HTML).
    fn serialized_content(&mut self) -> Result<String, ExplorerError>;

    fn wait(&mut self, ms: u64) -> Result<(), ExplorerError>;

    fn screenshot(&mut self, path: &str) -> Result<(), ExplorerError>;
}
