use serde::{Deserialize, Serialize};

use crate::screen::screen_model::ElementDescriptor;
use crate::state::identity::VisitedKey;

pub const INTERACTIVE_ROLES: [&str; 7] = [
    "button", "link", "menuitem", "checkbox", "tab", "switch", "option",
];

pub const INTERACTIVE_TAGS: [&str; 6] = ["button", "a", "input", "select", "textarea", "summary"];

/// Additive weights of the interactiveness heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub visible: f64,
    pub pointer_cursor: f64,
    pub focusable: f64,
    pub interactive_role: f64,
    pub interactive_tag: f64,
    pub in_form: f64,
    pub transition: f64,
    /// Text adds one point per character up to this cap
    pub text_cap: f64,
    /// Width or height at or below this fails the visibility gate
    pub min_size: f64,
    /// Elements scoring below this are not click candidates
    pub min_candidate_score: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            visible: 30.0,
            pointer_cursor: 25.0,
            focusable: 15.0,
            interactive_role: 30.0,
            interactive_tag: 25.0,
            in_form: 20.0,
            transition: 10.0,
            text_cap: 20.0,
            min_size: 10.0,
            min_candidate_score: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementScore {
    pub element: ElementDescriptor,
    pub score: f64,
    pub identity_key: VisitedKey,
}

pub struct ElementScorer {
    pub weights: ScoringWeights,
}

impl ElementScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Hard gate: too small, hidden, transparent or click-through.
    pub fn passes_visibility_gate(&self, el: &ElementDescriptor) -> bool {
        let b = &el.bounding_box;
        if b.width <= self.weights.min_size || b.height <= self.weights.min_size {
            return false;
        }

        let style = &el.style;
        if style.display.as_deref() == Some("none")
            || style.visibility.as_deref() == Some("hidden")
            || style.pointer_events.as_deref() == Some("none")
        {
            return false;
        }

        !matches!(style.opacity, Some(o) if o <= 0.0)
    }

    /// Interactiveness score; exactly 0 for anything failing the gate.
    pub fn score(&self, el: &ElementDescriptor) -> f64 {
        if !self.passes_visibility_gate(el) {
            return 0.0;
        }

        let w = &self.weights;
        let mut score = w.visible;

        if el.style.cursor.as_deref() == Some("pointer") {
            score += w.pointer_cursor;
        }

        if el.focusable {
            score += w.focusable;
        }

        let role = el.role.as_deref().unwrap_or("").to_lowercase();
        if INTERACTIVE_ROLES.contains(&role.as_str()) {
            score += w.interactive_role;
        }

        if INTERACTIVE_TAGS.contains(&el.tag.to_lowercase().as_str()) {
            score += w.interactive_tag;
        }

        if el.in_form {
            score += w.in_form;
        }

        if has_transition(el.style.transition_duration.as_deref()) {
            score += w.transition;
        }

        let text_len = el.visible_text().chars().count() as f64;
        score += text_len.min(w.text_cap);

        score
    }

    /// Score and rank elements, highest first.
    ///
    /// Gated and below-threshold elements are dropped. Ties keep document order.
    pub fn rank(&self, elements: &[ElementDescriptor]) -> Vec<ElementScore> {
        let mut scored: Vec<ElementScore> = elements
            .iter()
            .filter_map(|el| {
                let score = self.score(el);
                if score <= 0.0 || score < self.weights.min_candidate_score {
                    return None;
                }
                Some(ElementScore {
                    element: el.clone(),
                    score,
                    identity_key: VisitedKey::for_element(el),
                })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

impl Default for ElementScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

/// True for any duration list with a non-zero entry, e.g. `"0s, 0.3s"`.
fn has_transition(duration: Option<&str>) -> bool {
    let Some(duration) = duration else {
        return false;
    };
    duration.split(',').map(str::trim).any(|d| {
        let number = d.trim_end_matches("ms").trim_end_matches('s');
        number.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
    })
}
