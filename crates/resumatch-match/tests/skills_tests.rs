use std::collections::BTreeSet;

use resumatch_match::skills::{experience_score, skills_score, years_of_experience, EXPERIENCE_BONUS};

fn required(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn skills_score_is_fraction_of_required_found() {
    let text = "Senior engineer: Python, Django, 7 years shipping services";
    assert!((skills_score(text, &required(&["Python", "AWS"])) - 0.5).abs() < 1e-6);
    assert!((skills_score(text, &required(&["Python", "Django"])) - 1.0).abs() < 1e-6);
    assert!((skills_score(text, &required(&["Rust"])) - 0.0).abs() < 1e-6);
}

#[test]
fn skills_matching_is_case_insensitive() {
    let text = "built pipelines in PYTHON and aws";
    assert!((skills_score(text, &required(&["python", "AWS"])) - 1.0).abs() < 1e-6);
}

#[test]
fn empty_requirement_scores_zero() {
    assert!((skills_score("anything", &BTreeSet::new()) - 0.0).abs() < 1e-6);
}

#[test]
fn years_extraction_takes_first_figure() {
    assert_eq!(years_of_experience("7 years of backend work"), Some(7));
    assert_eq!(years_of_experience("5+ years with Kubernetes"), Some(5));
    assert_eq!(years_of_experience("3 yrs in data, then 10 years in ML"), Some(3));
    assert_eq!(years_of_experience("1 Year internship"), Some(1));
    assert_eq!(years_of_experience("years of experience unspecified"), None);
}

#[test]
fn experience_bonus_requires_meeting_the_minimum() {
    let text = "Python and 7 years of backend work";
    assert!((experience_score(text, 5) - EXPERIENCE_BONUS).abs() < 1e-6);
    assert!((experience_score(text, 7) - EXPERIENCE_BONUS).abs() < 1e-6);
    assert!((experience_score(text, 8) - 0.0).abs() < 1e-6);
}

#[test]
fn missing_years_figure_scores_zero_even_with_zero_minimum() {
    assert!((experience_score("no numbers here", 0) - 0.0).abs() < 1e-6);
}
