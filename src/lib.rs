//! Autonomous black-box explorer for web UIs.
//!
//! Each page is captured as a [`PageSnapshot`](screen::screen_model::PageSnapshot)
//! (OCR tokens plus DOM elements). Label/value instructions are paired with
//! inputs, clickable elements are ranked by an interactiveness heuristic, and
//! the [`ExplorationController`](explorer::explorer::ExplorationController)
//! clicks unvisited candidates until none of them changes the page.

pub mod browser;
pub mod cli;
pub mod error;
pub mod explorer;
pub mod matching;
pub mod scoring;
pub mod screen;
pub mod state;
pub mod trace;

pub use error::{ExplorerError, FillSourceError};
pub use explorer::app_map::{ExplorationReport, ExplorationState, HaltReason, StopSignal};
pub use explorer::explorer::ExplorationController;
