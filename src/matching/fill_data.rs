use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FillSourceError;

/// `<n>.<label>: <value>`
static FILL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.(.+?):\s*(.+)$").expect("fill line pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValuePair {
    pub label: String,
    pub value: String,
}

impl LabelValuePair {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parse fill instructions, ignoring lines that don't match.
///
/// A repeated label overwrites the earlier value in place, so the result keeps
/// first-seen label order.
pub fn parse_fill_instructions(text: &str) -> Vec<LabelValuePair> {
    let mut pairs: Vec<LabelValuePair> = Vec::new();

    for line in text.lines().map(str::trim) {
        let Some(caps) = FILL_LINE.captures(line) else {
            continue;
        };
        let label = caps[1].trim();
        let value = caps[2].trim();
        if label.is_empty() {
            continue;
        }

        match pairs.iter_mut().find(|p| p.label == label) {
            Some(existing) => existing.value = value.to_string(),
            None => pairs.push(LabelValuePair::new(label, value)),
        }
    }

    pairs
}

/// Where the label/value pairs for the current page come from.
pub trait FillSource {
    fn load(&mut self) -> Result<Vec<LabelValuePair>, FillSourceError>;
}

/// Fixed pairs, mostly for tests and embedding.
pub struct StaticFillSource(pub Vec<LabelValuePair>);

impl FillSource for StaticFillSource {
    fn load(&mut self) -> Result<Vec<LabelValuePair>, FillSourceError> {
        if self.0.is_empty() {
            return Err(FillSourceError::Empty("<static>".into()));
        }
        Ok(self.0.clone())
    }
}

/// Line-oriented instruction file, optionally regenerated by an external
/// command before every read.
pub struct FileFillSource {
    pub path: PathBuf,
    pub generator: Option<Vec<String>>,
}

impl FileFillSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            generator: None,
        }
    }

    pub fn with_generator(mut self, command: Vec<String>) -> Self {
        if !command.is_empty() {
            self.generator = Some(command);
        }
        self
    }

    fn run_generator(&self, command: &[String]) -> Result<(), FillSourceError> {
        let shown = command.join(" ");
        let (program, args) = match command.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        info!(command = %shown, "running fill generator");
        let status = Command::new(program).args(args).status().map_err(|e| {
            FillSourceError::Generator {
                command: shown.clone(),
                reason: e.to_string(),
            }
        })?;

        if !status.success() {
            return Err(FillSourceError::Generator {
                command: shown,
                reason: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

impl FillSource for FileFillSource {
    fn load(&mut self) -> Result<Vec<LabelValuePair>, FillSourceError> {
        if let Some(command) = &self.generator {
            self.run_generator(command)?;
        }

        let path = self.path.display().to_string();
        if !self.path.exists() {
            return Err(FillSourceError::Missing(path));
        }

        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| FillSourceError::Io { path: path.clone(), source: e })?;

        let pairs = parse_fill_instructions(&text);
        if pairs.is_empty() {
            return Err(FillSourceError::Empty(path));
        }

        debug!(count = pairs.len(), "loaded fill instructions");
        Ok(pairs)
    }
}
