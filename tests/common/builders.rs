use std::path::Path;

use ui_explorer::error::ExplorerError;
use ui_explorer::screen::ocr::{OcrEngine, OcrResult, OcrWord};
use ui_explorer::screen::screen_model::{
    ElementBox, ElementDescriptor, OcrBox, OcrToken, PageSnapshot, StyleHints,
};

pub fn bbox(x: f64, y: f64, width: f64, height: f64) -> ElementBox {
    ElementBox { x, y, width, height }
}

/// Text input at (x, y), 200x30.
pub fn input(ref_id: u64, x: f64, y: f64) -> ElementDescriptor {
    ElementDescriptor {
        tag: "input".into(),
        r#type: Some("text".into()),
        bounding_box: bbox(x, y, 200.0, 30.0),
        visible: true,
        focusable: true,
        ref_id: Some(ref_id),
        ..ElementDescriptor::default()
    }
}

pub fn input_with_placeholder(ref_id: u64, placeholder: &str, x: f64, y: f64) -> ElementDescriptor {
    ElementDescriptor {
        placeholder: Some(placeholder.into()),
        ..input(ref_id, x, y)
    }
}

/// Visible button with pointer cursor, 120x40.
pub fn button(ref_id: u64, text: &str, x: f64, y: f64) -> ElementDescriptor {
    ElementDescriptor {
        tag: "button".into(),
        inner_text: Some(text.into()),
        bounding_box: bbox(x, y, 120.0, 40.0),
        visible: true,
        focusable: true,
        style: StyleHints {
            cursor: Some("pointer".into()),
            ..StyleHints::default()
        },
        ref_id: Some(ref_id),
        ..ElementDescriptor::default()
    }
}

pub fn plain_div(text: &str, x: f64, y: f64) -> ElementDescriptor {
    ElementDescriptor {
        tag: "div".into(),
        inner_text: Some(text.into()),
        bounding_box: bbox(x, y, 300.0, 50.0),
        visible: true,
        ..ElementDescriptor::default()
    }
}

/// OCR token whose box is centred at (cx, cy).
pub fn token(text: &str, cx: f64, cy: f64) -> OcrToken {
    OcrToken {
        text: text.into(),
        bbox: OcrBox {
            x0: cx - 30.0,
            y0: cy - 8.0,
            x1: cx + 30.0,
            y1: cy + 8.0,
        },
        confidence: 91.0,
    }
}

pub fn snapshot(
    tokens: Vec<OcrToken>,
    elements: Vec<ElementDescriptor>,
    candidates: Vec<ElementDescriptor>,
) -> PageSnapshot {
    PageSnapshot {
        url: "http://localhost:3001/".into(),
        captured_at: 1_700_000_000_000,
        text_blocks: vec![],
        ocr_tokens: tokens,
        elements,
        candidates,
    }
}

/// OCR engine returning a fixed result, or failing.
pub struct FakeOcr {
    pub words: Vec<OcrWord>,
    pub text: String,
    pub fail: bool,
}

impl FakeOcr {
    pub fn with_words(words: &[(&str, f64, f64)]) -> Self {
        let words = words
            .iter()
            .map(|(text, cx, cy)| {
                let t = token(text, *cx, *cy);
                OcrWord {
                    text: t.text,
                    bbox: t.bbox,
                    confidence: t.confidence,
                }
            })
            .collect::<Vec<_>>();
        let text = words
            .iter()
            .map(|w| w.text.clone())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            words,
            text,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            words: vec![],
            text: String::new(),
            fail: true,
        }
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, _image_path: &Path) -> Result<OcrResult, ExplorerError> {
        if self.fail {
            return Err(ExplorerError::Ocr("service unavailable".into()));
        }
        Ok(OcrResult {
            text: self.text.clone(),
            words: self.words.clone(),
        })
    }
}
