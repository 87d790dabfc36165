use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::explorer::app_map::ExplorerConfig;
use crate::matching::label_matcher::MatchConfig;
use crate::scoring::element_scorer::ScoringWeights;

pub const DEFAULT_START_URL: &str = "http://localhost:3001";
pub const DEFAULT_CONFIG_PATH: &str = "ui-explorer.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-explorer",
    version,
    about = "Autonomous black-box explorer for web UIs"
)]
pub struct Cli {
    /// URL to start exploring from
    #[arg(default_value = DEFAULT_START_URL)]
    pub url: String,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file (default: ui-explorer.yaml in current dir)
    #[arg(long)]
    pub config: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-explorer.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub explore: ExplorerConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// HTTP OCR service; without one, matching uses DOM attributes only
    pub endpoint: Option<String>,

    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_ocr_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_server_script")]
    pub server_script: String,

    /// Per-keystroke delay when typing fill values
    #[serde(default = "default_type_delay")]
    pub type_delay_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: default_server_script(),
            type_delay_ms: default_type_delay(),
        }
    }
}

// Serde default helpers
fn default_ocr_timeout() -> u64 { 30 }
fn default_server_script() -> String { "node/browser_server.js".to_string() }
fn default_type_delay() -> u64 { 100 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "malformed config, using defaults");
            AppConfig::default()
        }
    }
}

/// `tracing` filter directive for a `-v` count, unless `RUST_LOG` is set.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "ui_explorer=info",
        1 => "ui_explorer=debug",
        _ => "ui_explorer=trace",
    }
}
