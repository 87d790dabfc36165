use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ExplorerError;
use crate::screen::screen_model::{OcrBox, OcrToken};

/// Output shape of a recognition pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub bbox: OcrBox,
    #[serde(default)]
    pub confidence: f32,
}

impl OcrResult {
    /// Non-empty lines of the full recognized text.
    pub fn text_blocks(&self) -> Vec<String> {
        self.text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn into_tokens(self) -> Vec<OcrToken> {
        self.words
            .into_iter()
            .filter(|w| !w.text.trim().is_empty())
            .map(|w| OcrToken {
                text: w.text,
                bbox: w.bbox,
                confidence: w.confidence,
            })
            .collect()
    }
}

pub trait OcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<OcrResult, ExplorerError>;
}

/// Used when no OCR service is configured: matching runs on DOM data alone.
pub struct NullOcrEngine;

impl OcrEngine for NullOcrEngine {
    fn recognize(&self, _image_path: &Path) -> Result<OcrResult, ExplorerError> {
        Ok(OcrResult::default())
    }
}

/// OCR service reachable over HTTP.
///
/// The screenshot bytes are POSTed as the request body; the service answers
/// with `{ "text": ..., "words": [{ "text", "bbox": {x0,y0,x1,y1}, "confidence" }] }`.
pub struct HttpOcrEngine {
    pub endpoint: String,
    pub timeout: Duration,
}

impl HttpOcrEngine {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl OcrEngine for HttpOcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<OcrResult, ExplorerError> {
        let bytes = std::fs::read(image_path).map_err(|e| ExplorerError::Io {
            context: format!("reading screenshot {}", image_path.display()),
            source: e,
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ExplorerError::Ocr(e.to_string()))?;

        let response = client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(bytes)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExplorerError::Ocr(e.to_string()))?;

        response
            .json::<OcrResult>()
            .map_err(|e| ExplorerError::Ocr(format!("invalid OCR response: {}", e)))
    }
}
