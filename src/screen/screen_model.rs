use serde::{Deserialize, Serialize};

/// Tags that accept typed values.
pub const INPUT_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Element geometry in viewport coordinates, as reported by layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Corner-based box as produced by the OCR service.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl OcrBox {
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// A recognized run of text with its location on the screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    pub text: String,
    pub bbox: OcrBox,
    #[serde(default)]
    pub confidence: f32,
}

/// Computed style values captured alongside the element.
///
/// Every field is optional: a missing value never counts against an element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleHints {
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub pointer_events: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub transition_duration: Option<String>,
}

/// Structural description of one DOM element at capture time.
///
/// `bounding_box` and `visible` come from live layout and are stale once the
/// page changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub inner_text: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub bounding_box: ElementBox,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub visible: bool,
    /// tabIndex >= 0
    #[serde(default)]
    pub focusable: bool,
    /// Has a `<form>` ancestor
    #[serde(default)]
    pub in_form: bool,
    #[serde(default)]
    pub style: StyleHints,
    /// Handle assigned by the browser server while enumerating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<u64>,
}

impl ElementDescriptor {
    pub fn is_input_capable(&self) -> bool {
        INPUT_TAGS.contains(&self.tag.as_str())
    }

    /// Attribute texts a visible label may correspond to, in priority order.
    pub fn label_sources(&self) -> impl Iterator<Item = &str> {
        [&self.placeholder, &self.aria_label, &self.name, &self.id]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// First non-empty of placeholder, aria-label, name, id.
    pub fn primary_attribute(&self) -> Option<&str> {
        self.label_sources().next()
    }

    /// Inner text, falling back to aria-label then alt text.
    pub fn visible_text(&self) -> &str {
        [&self.inner_text, &self.aria_label, &self.alt]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Short human-readable name for logs.
    pub fn describe(&self) -> String {
        let label = self
            .primary_attribute()
            .map(str::to_string)
            .unwrap_or_else(|| self.visible_text().to_string());
        if label.is_empty() {
            format!("<{}>", self.tag)
        } else {
            format!("<{}> \"{}\"", self.tag, label)
        }
    }
}

/// OCR tokens and DOM elements of one page at one instant.
///
/// Produced fresh on every extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub url: String,
    /// Milliseconds since the Unix epoch
    pub captured_at: u64,
    #[serde(default)]
    pub text_blocks: Vec<String>,
    #[serde(default)]
    pub ocr_tokens: Vec<OcrToken>,
    /// Fill-kind elements: input, textarea, select, button, a
    #[serde(default)]
    pub elements: Vec<ElementDescriptor>,
    /// Every element under `<body>`, for click scoring. Not persisted.
    #[serde(default, skip_serializing)]
    pub candidates: Vec<ElementDescriptor>,
}

impl PageSnapshot {
    pub fn input_elements(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.elements.iter().filter(|el| el.is_input_capable())
    }

    pub fn is_degraded(&self) -> bool {
        self.ocr_tokens.is_empty()
    }
}
