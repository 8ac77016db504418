//! Education-level detection.
//!
//! Naive keyword presence over-reports simultaneous levels: a Masters
//! holder's resume usually also names the Bachelors degree that preceded
//! it. Detection therefore works in three steps: extract the education
//! section, score every level that has keyword hits, then resolve the
//! candidates through the fixed hierarchy so each document holds exactly
//! one level (or none).

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use resumatch_core::types::{EducationLevel, EducationMatch};

/// A line containing one of these enters education mode.
const SECTION_ENTRY: &[&str] = &[
    "education",
    "qualification",
    "degree",
    "academic",
    "university",
    "college",
    "institute",
    "school",
];

/// A line containing one of these ends the education section.
const SECTION_EXIT: &[&str] = &[
    "experience",
    "work history",
    "professional experience",
    "skills",
    "projects",
    "certification",
    "achievements",
];

/// Keywords unambiguous enough to raise confidence on their own.
const STRONG_KEYWORDS: &[&str] = &["phd", "doctorate", "masters", "mba", "btech", "bachelor"];

/// Ordered pattern table: level -> word-boundary regexes applied to the
/// lowercased document, abbreviations first, full names second. Levels are
/// listed highest-first so iteration order matches the hierarchy.
static LEVEL_PATTERNS: LazyLock<Vec<(EducationLevel, Vec<Regex>)>> = LazyLock::new(|| {
    fn compile(patterns: &[&str]) -> Vec<Regex> {
        patterns.iter().map(|p| Regex::new(p).expect("education pattern")).collect()
    }
    vec![
        (
            EducationLevel::Phd,
            compile(&[r"\b(?:ph\.?d\.?|d\.?phil)\b", r"\b(?:doctor of philosophy|doctorate|doctoral)\b"]),
        ),
        (
            EducationLevel::Masters,
            compile(&[
                r"\b(?:m\.?s\.?|m\.?sc|m\.?tech|m\.?e\.?|m\.?a\.?|m\.?com|mba|mca)\b",
                r"\b(?:master of \w+|master'?s(?: degree)?|master degree|masters)\b",
            ]),
        ),
        (
            EducationLevel::Bachelors,
            compile(&[
                r"\b(?:b\.?e\.?|b\.?tech|b\.?sc|b\.?a\.?|b\.?com|b\.?eng|bca)\b",
                r"\b(?:bachelor of \w+|bachelor'?s(?: degree)?|bachelor degree|bachelors)\b",
            ]),
        ),
    ]
});

/// Confidence constants. The defaults were chosen empirically against the
/// production corpus and are pending recalibration on a labeled set; treat
/// them as configuration, not truth.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceWeights {
    /// Starting confidence for any level with keyword hits.
    pub base: f32,
    /// Added when a hit also occurs inside the extracted section.
    pub section_bonus: f32,
    /// Added when one of the hits is a strong keyword.
    pub strong_bonus: f32,
    /// Subtracted when "experience"/"work" leaked into the section.
    pub leakage_penalty: f32,
    /// Confidence a candidate must exceed to win resolution outright.
    pub resolve_threshold: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            base: 0.5,
            section_bonus: 0.3,
            strong_bonus: 0.2,
            leakage_penalty: 0.1,
            resolve_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EducationMatcher {
    weights: ConfidenceWeights,
}

impl EducationMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ConfidenceWeights) -> Self {
        Self { weights }
    }

    /// The contiguous block of lines from the first section-entry line up
    /// to (excluding) the first exit line after it. Empty when the text has
    /// no section markers.
    pub fn extract_section(&self, text: &str) -> String {
        let mut section = Vec::new();
        let mut in_education = false;
        for line in text.lines() {
            let line_lower = line.to_lowercase();
            if SECTION_ENTRY.iter().any(|k| line_lower.contains(k)) {
                in_education = true;
                section.push(line);
                continue;
            }
            if in_education {
                if SECTION_EXIT.iter().any(|k| line_lower.contains(k)) {
                    break;
                }
                section.push(line);
            }
        }
        section.join("\n")
    }

    /// Every level with keyword hits anywhere in the document, scored.
    /// Always scans all three levels; the query's target set plays no role
    /// until the strict filter.
    pub fn find_matches(&self, text: &str) -> Vec<EducationMatch> {
        let text_lower = text.to_lowercase();
        let section = self.extract_section(text);
        let section_lower = section.to_lowercase();

        let mut matches = Vec::new();
        for (level, patterns) in LEVEL_PATTERNS.iter() {
            let mut keywords = Vec::new();
            for pattern in patterns {
                keywords.extend(pattern.find_iter(&text_lower).map(|m| m.as_str().to_string()));
            }
            if keywords.is_empty() {
                continue;
            }
            let confidence = self.confidence(&keywords, &section_lower);
            matches.push(EducationMatch {
                level: *level,
                confidence,
                keywords,
                context: section.clone(),
            });
        }
        matches
    }

    fn confidence(&self, keywords: &[String], section_lower: &str) -> f32 {
        let w = self.weights;
        let mut confidence = w.base;
        if keywords.iter().any(|k| section_lower.contains(k.as_str())) {
            confidence += w.section_bonus;
        }
        if keywords.iter().any(|k| STRONG_KEYWORDS.contains(&k.as_str())) {
            confidence += w.strong_bonus;
        }
        if section_lower.contains("experience") || section_lower.contains("work") {
            confidence -= w.leakage_penalty;
        }
        confidence.clamp(0.0, 1.0)
    }

    /// The single level the document is considered to hold. With several
    /// candidate levels, they sort highest-first and the first whose
    /// confidence exceeds the resolve threshold wins; when none does, the
    /// highest level wins regardless of confidence.
    pub fn resolve(&self, text: &str) -> Option<EducationMatch> {
        let mut matches = self.find_matches(text);
        if matches.len() <= 1 {
            return matches.pop();
        }
        matches.sort_by(|a, b| b.level.cmp(&a.level));
        let threshold = self.weights.resolve_threshold;
        let fallback = matches[0].clone();
        matches.into_iter().find(|m| m.confidence > threshold).or(Some(fallback))
    }

    /// Strict filter: the document matches `targets` iff its resolved
    /// level is a member of the set. A raw keyword hit for a target level
    /// is not enough when a higher level resolves.
    pub fn matches_levels(&self, text: &str, targets: &BTreeSet<EducationLevel>) -> bool {
        self.resolve(text).is_some_and(|m| targets.contains(&m.level))
    }
}
