use std::collections::BTreeSet;

use resumatch_core::types::EducationLevel;
use resumatch_match::EducationMatcher;

fn levels(list: &[EducationLevel]) -> BTreeSet<EducationLevel> {
    list.iter().copied().collect()
}

#[test]
fn section_stops_at_experience_heading() {
    let matcher = EducationMatcher::new();
    let text = "SUMMARY\nSenior engineer\nEDUCATION\nMtech in AI, 2020\nBtech in CS, 2016\nEXPERIENCE\nAcme Corp, backend team";
    let section = matcher.extract_section(text);
    assert_eq!(section, "EDUCATION\nMtech in AI, 2020\nBtech in CS, 2016");
}

#[test]
fn section_is_empty_without_markers() {
    let matcher = EducationMatcher::new();
    assert_eq!(matcher.extract_section("just some plain text"), "");
}

#[test]
fn masters_beats_bachelors_via_hierarchy() {
    let matcher = EducationMatcher::new();
    let text = "EDUCATION\nMtech in AI, 2020\nBtech in CS, 2016\nEXPERIENCE\nAcme Corp";
    let resolved = matcher.resolve(text).expect("a level resolves");
    assert_eq!(resolved.level, EducationLevel::Masters);
    assert!(resolved.confidence > 0.6, "confidence = {}", resolved.confidence);
    assert!(resolved.keywords.iter().any(|k| k == "mtech"));

    assert!(matcher.matches_levels(text, &levels(&[EducationLevel::Masters])));
    assert!(!matcher.matches_levels(text, &levels(&[EducationLevel::Phd])));
}

#[test]
fn hierarchy_wins_even_when_lower_level_scores_higher() {
    let matcher = EducationMatcher::new();
    // "btech" is a strong keyword, "mtech" is not; masters must still win.
    let text = "Mtech In Artificial Intelligence JULY 2024 present PUNJABI UNIVERSITY Patiala \
                Btech In Computer Science Engineering 2015 2019";
    let resolved = matcher.resolve(text).expect("a level resolves");
    assert_eq!(resolved.level, EducationLevel::Masters);
    assert!(matcher.matches_levels(text, &levels(&[EducationLevel::Masters])));
}

#[test]
fn garbled_tokens_resolve_to_nothing() {
    let matcher = EducationMatcher::new();
    // OCR artifact: "B.T ech" with an interior space matches no pattern.
    let text = "2015 B.T ech. ECE from ITER with 7.21 CGPA 2011 12th from City School";
    assert!(matcher.resolve(text).is_none());
    assert!(!matcher.matches_levels(text, &levels(&[EducationLevel::Phd])));
}

#[test]
fn prerequisite_bachelors_does_not_mask_masters() {
    let matcher = EducationMatcher::new();
    let text = "Masters in Computer Science from University of Texas, B.Sc in Mathematics from State University";
    let resolved = matcher.resolve(text).expect("a level resolves");
    assert_eq!(resolved.level, EducationLevel::Masters);
    assert!((resolved.confidence - 1.0).abs() < 1e-6);
}

#[test]
fn bachelors_only_never_matches_phd_targets() {
    let matcher = EducationMatcher::new();
    let text = "EDUCATION\nBachelor of Technology, 2018\nSKILLS\nJava";
    assert!(!matcher.matches_levels(text, &levels(&[EducationLevel::Phd])));
    assert!(matcher.matches_levels(text, &levels(&[EducationLevel::Bachelors])));
}

#[test]
fn low_confidence_everywhere_falls_back_to_highest_level() {
    let matcher = EducationMatcher::new();
    // No section markers, no strong keywords: both levels stay at base 0.5.
    let text = "mtech b.sc";
    let resolved = matcher.resolve(text).expect("a level resolves");
    assert_eq!(resolved.level, EducationLevel::Masters);
    assert!((resolved.confidence - 0.5).abs() < 1e-6);
}

#[test]
fn leakage_penalty_applies_inside_section() {
    let matcher = EducationMatcher::new();
    // One-line documents put everything in the section, including the word
    // "experience"; the penalty keeps confidence at 0.9 instead of 1.0.
    let text = "Masters in Computer Science from State University, 6 years experience";
    let resolved = matcher.resolve(text).expect("a level resolves");
    assert_eq!(resolved.level, EducationLevel::Masters);
    assert!((resolved.confidence - 0.9).abs() < 1e-6);
}

#[test]
fn no_hits_resolve_to_none() {
    let matcher = EducationMatcher::new();
    assert!(matcher.resolve("plumber with 20 years on the job").is_none());
    assert!(matcher.resolve("").is_none());
}
