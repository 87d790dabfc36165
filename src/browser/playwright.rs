use serde::Serialize;

use crate::screen::screen_model::ElementDescriptor;

/// Elements considered for filling (and persisted with each snapshot).
pub const FILL_SELECTOR: &str = "input, textarea, select, button, a";

/// Elements considered for click scoring.
pub const CANDIDATE_SELECTOR: &str = "body *";

/// How the browser server locates an element captured earlier.
///
/// `ref_id` is the handle the server stamped during enumeration; the
/// coordinates are the box centre, used when the handle is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRef {
    #[serde(rename = "refId", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<u64>,
    pub tag: String,
    pub x: f64,
    pub y: f64,
}

impl ElementRef {
    pub fn for_element(el: &ElementDescriptor) -> Self {
        let (x, y) = el.bounding_box.center();
        Self {
            ref_id: el.ref_id,
            tag: el.tag.clone(),
            x,
            y,
        }
    }
}
