/// Placeholder text for elements with nothing readable.
pub const NO_LABEL: &str = "[no-label]";

/// Collapse whitespace runs and trim. Empty input becomes `[no-label]`.
pub fn normalize_text(raw: &str) -> String {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        NO_LABEL.to_string()
    } else {
        normalized
    }
}

/// Round a layout coordinate so sub-pixel jitter maps to the same integer.
pub fn round_coord(v: f64) -> i64 {
    if v.is_finite() { v.round() as i64 } else { 0 }
}

/// SHA-1 hex digest of serialized page content.
pub fn content_signature(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
