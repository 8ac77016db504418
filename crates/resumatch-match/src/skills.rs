//! Skill coverage and years-of-experience scoring.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Fixed bonus awarded when the stated years meet the requested minimum.
pub const EXPERIENCE_BONUS: f32 = 0.5;

static YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*\+?\s*(?:years|yrs|year)\b").expect("years pattern"));

/// Fraction of required skills found in the text, in [0, 1]. Matching is
/// case-insensitive substring search; an empty requirement scores 0.
pub fn skills_score(text: &str, required: &BTreeSet<String>) -> f32 {
    if required.is_empty() {
        return 0.0;
    }
    let text_lower = text.to_lowercase();
    let found = required.iter().filter(|s| text_lower.contains(&s.to_lowercase())).count();
    found as f32 / required.len() as f32
}

/// The first parseable `<n> years`-style figure in the text, if any.
pub fn years_of_experience(text: &str) -> Option<u32> {
    YEARS.captures_iter(text).find_map(|c| c[1].parse::<u32>().ok())
}

/// `EXPERIENCE_BONUS` when the text states at least `min_years` of
/// experience, otherwise 0. A resume with no years figure scores 0;
/// absence is neutral, never an error.
pub fn experience_score(text: &str, min_years: u32) -> f32 {
    match years_of_experience(text) {
        Some(years) if years >= min_years => EXPERIENCE_BONUS,
        _ => 0.0,
    }
}
