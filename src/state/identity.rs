use std::fmt;

use serde::{Deserialize, Serialize};

use crate::screen::screen_model::ElementDescriptor;
use crate::state::normalize::{normalize_text, round_coord};

/// Heuristic identity of an element occurrence:
/// `tag::normalized text::round(x)::round(y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitedKey(String);

impl VisitedKey {
    pub fn new(tag: &str, text: &str, x: f64, y: f64) -> Self {
        VisitedKey(format!(
            "{}::{}::{}::{}",
            tag.to_lowercase(),
            normalize_text(text),
            round_coord(x),
            round_coord(y)
        ))
    }

    pub fn for_element(el: &ElementDescriptor) -> Self {
        Self::new(
            &el.tag,
            el.visible_text(),
            el.bounding_box.x,
            el.bounding_box.y,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
