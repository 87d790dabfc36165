use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::fill_data::LabelValuePair;
use crate::matching::similarity::{dice_coefficient, distance, proximity_score};
use crate::screen::screen_model::{ElementDescriptor, OcrToken, PageSnapshot};

/// Weights and thresholds for pairing a label with an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub text_weight: f64,
    pub proximity_weight: f64,
    /// Distance (layout units) at which proximity contributes nothing
    pub max_distance: f64,
    /// Candidates at or below this combined score are noise
    pub min_score: f64,
    /// Minimum Dice similarity for an OCR token to stand in for a label it
    /// does not literally contain
    pub token_similarity: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.7,
            proximity_weight: 0.3,
            max_distance: 300.0,
            min_score: 0.4,
            token_similarity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub element: ElementDescriptor,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchPath {
    /// Label found inside placeholder / aria-label / name / id
    Attribute,
    /// Nearest similar input to an OCR token
    Fuzzy { score: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub label: String,
    pub value: String,
    pub element: ElementDescriptor,
    pub path: MatchPath,
}

#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub assignments: Vec<Assignment>,
    pub unmatched: Vec<String>,
}

pub struct LabelMatcher {
    pub config: MatchConfig,
}

impl LabelMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Pair every label with at most one input. Each pair is resolved
    /// independently; unmatched labels are reported, never fatal.
    pub fn assign(&self, pairs: &[LabelValuePair], snapshot: &PageSnapshot) -> MatchReport {
        let mut report = MatchReport::default();

        for pair in pairs {
            let hit = self
                .attribute_match(&pair.label, snapshot)
                .map(|el| (el.clone(), MatchPath::Attribute))
                .or_else(|| {
                    self.fuzzy_match(&pair.label, snapshot)
                        .map(|c| (c.element, MatchPath::Fuzzy { score: c.score }))
                });

            match hit {
                Some((element, path)) => {
                    debug!(label = %pair.label, element = %element.describe(), ?path, "matched label");
                    report.assignments.push(Assignment {
                        label: pair.label.clone(),
                        value: pair.value.clone(),
                        element,
                        path,
                    });
                }
                None => {
                    warn!(label = %pair.label, "no input matched label");
                    report.unmatched.push(pair.label.clone());
                }
            }
        }

        report
    }

    /// First input whose primary attribute contains the label, case-insensitively.
    pub fn attribute_match<'a>(
        &self,
        label: &str,
        snapshot: &'a PageSnapshot,
    ) -> Option<&'a ElementDescriptor> {
        let needle = label.to_lowercase();
        snapshot.input_elements().find(|el| {
            el.primary_attribute()
                .map(|attr| attr.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    /// OCR token standing for the label on screen.
    ///
    /// A token containing the label wins; otherwise the most similar token,
    /// if similar enough, so misspelled labels still find their anchor.
    pub fn locate_token<'a>(&self, label: &str, tokens: &'a [OcrToken]) -> Option<&'a OcrToken> {
        let needle = label.to_lowercase();
        if let Some(token) = tokens
            .iter()
            .find(|t| t.text.to_lowercase().contains(&needle))
        {
            return Some(token);
        }

        let mut best: Option<(&OcrToken, f64)> = None;
        for token in tokens {
            let sim = dice_coefficient(label, &token.text);
            if sim >= self.config.token_similarity && best.map_or(true, |(_, s)| sim > s) {
                best = Some((token, sim));
            }
        }
        best.map(|(t, _)| t)
    }

    pub fn fuzzy_match(&self, label: &str, snapshot: &PageSnapshot) -> Option<MatchCandidate> {
        let token = self.locate_token(label, &snapshot.ocr_tokens)?;
        let token_text = token.text.to_lowercase();

        let mut best: Option<MatchCandidate> = None;
        for el in snapshot.input_elements() {
            let score = self.combined_score(&token_text, token, el);
            if score <= self.config.min_score {
                continue;
            }
            // Strictly greater keeps the earliest element on ties
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(MatchCandidate {
                    element: el.clone(),
                    score,
                });
            }
        }
        best
    }

    /// `text_weight * similarity + proximity_weight * proximity`.
    pub fn combined_score(&self, token_text: &str, token: &OcrToken, el: &ElementDescriptor) -> f64 {
        let similarity = text_similarity(token_text, el);
        let dist = distance(token.bbox.center(), el.bounding_box.center());
        self.weigh(similarity, dist)
    }

    pub fn weigh(&self, similarity: f64, dist: f64) -> f64 {
        self.config.text_weight * similarity
            + self.config.proximity_weight * proximity_score(dist, self.config.max_distance)
    }
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

/// Best Dice similarity between the text and any of the element's attributes.
pub fn text_similarity(text: &str, el: &ElementDescriptor) -> f64 {
    el.label_sources()
        .map(|src| dice_coefficient(text, src))
        .fold(0.0, f64::max)
}
