use std::collections::HashMap;

use ui_explorer::browser::driver::BrowserDriver;
use ui_explorer::browser::playwright::{CANDIDATE_SELECTOR, ElementRef, FILL_SELECTOR};
use ui_explorer::error::ExplorerError;
use ui_explorer::screen::screen_model::ElementDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String),
    GetElements(String),
    Fill(Option<u64>, String),
    Click(Option<u64>),
    ClickAt(f64, f64),
    CurrentUrl,
    Content,
    Wait(u64),
    Screenshot(String),
}

/// What happens when an element (by ref id) is clicked.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Browser moves to another URL
    Navigate(String),
    /// DOM content of the current page changes
    Mutate(String),
    /// Handle click errors; coordinate click then applies the inner effect
    HandleFails(Box<ClickEffect>),
    /// Both click styles error
    AlwaysFails,
    Nothing,
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub fill_elements: Vec<ElementDescriptor>,
    pub candidates: Vec<ElementDescriptor>,
    pub content: String,
}

/// Scripted in-memory browser that records every call.
#[derive(Default)]
pub struct FakeBrowser {
    pub pages: HashMap<String, FakePage>,
    pub effects: HashMap<u64, ClickEffect>,
    pub calls: Vec<Call>,
    pub url: String,
    pub content: String,
    pub fail_navigation: bool,
    pub fail_screenshot: bool,
    /// Fill calls targeting this ref id error
    pub fail_fill_ref: Option<u64>,
    /// Effect waiting for a coordinate fallback click
    pending_fallback: Option<ClickEffect>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn with_effect(mut self, ref_id: u64, effect: ClickEffect) -> Self {
        self.effects.insert(ref_id, effect);
        self
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clicks(&self) -> usize {
        self.count(|c| matches!(c, Call::Click(_)))
    }

    pub fn fills(&self) -> Vec<(Option<u64>, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill(id, v) => Some((*id, v.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Navigate(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    fn apply(&mut self, effect: ClickEffect) -> Result<(), ExplorerError> {
        match effect {
            ClickEffect::Navigate(url) => {
                self.content = self
                    .pages
                    .get(&url)
                    .map(|p| p.content.clone())
                    .unwrap_or_default();
                self.url = url;
                Ok(())
            }
            ClickEffect::Mutate(content) => {
                self.content = content;
                Ok(())
            }
            ClickEffect::HandleFails(inner) => {
                self.pending_fallback = Some(*inner);
                Err(ExplorerError::SessionProtocol {
                    command: "click".into(),
                    error: "element detached".into(),
                })
            }
            ClickEffect::AlwaysFails => Err(ExplorerError::SessionProtocol {
                command: "click".into(),
                error: "element not clickable".into(),
            }),
            ClickEffect::Nothing => Ok(()),
        }
    }
}

impl BrowserDriver for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), ExplorerError> {
        self.calls.push(Call::Navigate(url.to_string()));
        if self.fail_navigation {
            return Err(ExplorerError::SessionProtocol {
                command: "navigate".into(),
                error: "net::ERR_CONNECTION_REFUSED".into(),
            });
        }
        self.url = url.to_string();
        self.content = self
            .pages
            .get(url)
            .map(|p| p.content.clone())
            .unwrap_or_default();
        Ok(())
    }

    fn get_elements(&mut self, selector: &str) -> Result<Vec<ElementDescriptor>, ExplorerError> {
        self.calls.push(Call::GetElements(selector.to_string()));
        let page = self.pages.get(&self.url).cloned().unwrap_or_default();
        Ok(match selector {
            FILL_SELECTOR => page.fill_elements,
            CANDIDATE_SELECTOR => page.candidates,
            _ => vec![],
        })
    }

    fn fill(&mut self, target: &ElementRef, value: &str) -> Result<(), ExplorerError> {
        self.calls.push(Call::Fill(target.ref_id, value.to_string()));
        if target.ref_id.is_some() && target.ref_id == self.fail_fill_ref {
            return Err(ExplorerError::SessionProtocol {
                command: "fill".into(),
                error: "element is not editable".into(),
            });
        }
        Ok(())
    }

    fn click(&mut self, target: &ElementRef) -> Result<(), ExplorerError> {
        self.calls.push(Call::Click(target.ref_id));
        let effect = target
            .ref_id
            .and_then(|id| self.effects.get(&id).cloned())
            .unwrap_or(ClickEffect::Nothing);
        self.apply(effect)
    }

    fn click_at(&mut self, x: f64, y: f64) -> Result<(), ExplorerError> {
        self.calls.push(Call::ClickAt(x, y));
        match self.pending_fallback.take() {
            Some(effect) => self.apply(effect),
            None => Err(ExplorerError::SessionProtocol {
                command: "click_at".into(),
                error: "nothing at point".into(),
            }),
        }
    }

    fn current_url(&mut self) -> Result<String, ExplorerError> {
        self.calls.push(Call::CurrentUrl);
        Ok(self.url.clone())
    }

    fn serialized_content(&mut self) -> Result<String, ExplorerError> {
        self.calls.push(Call::Content);
        Ok(self.content.clone())
    }

    fn wait(&mut self, ms: u64) -> Result<(), ExplorerError> {
        self.calls.push(Call::Wait(ms));
        Ok(())
    }

    fn screenshot(&mut self, path: &str) -> Result<(), ExplorerError> {
        self.calls.push(Call::Screenshot(path.to_string()));
        if self.fail_screenshot {
            return Err(ExplorerError::SessionIO("page closed".into()));
        }
        Ok(())
    }
}
