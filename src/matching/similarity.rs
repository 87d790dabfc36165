/// Character bigrams of a string, in order, duplicates kept.
fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Sørensen–Dice coefficient over lower-cased character bigrams.
///
/// Identical non-empty strings score 1, an empty side scores 0. Shared bigrams
/// are counted as a multiset, so the result is symmetric.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    let a_bigrams = bigrams(&a);
    let mut remaining = bigrams(&b);
    let total = a_bigrams.len() + remaining.len();
    if total == 0 {
        return 0.0;
    }

    let mut hits = 0usize;
    for bigram in &a_bigrams {
        if let Some(pos) = remaining.iter().position(|b| b == bigram) {
            remaining.swap_remove(pos);
            hits += 1;
        }
    }

    (2.0 * hits as f64) / total as f64
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// 1 at distance 0, falling linearly to 0 at `max_distance` and beyond.
pub fn proximity_score(distance: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 || distance >= max_distance {
        return 0.0;
    }
    (1.0 - distance / max_distance).clamp(0.0, 1.0)
}
