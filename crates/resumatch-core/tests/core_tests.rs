use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

use resumatch_core::loader::{clean_text, load_dir};
use resumatch_core::types::{content_hash, Document, EducationLevel, Query, DOC_TYPE_NOTE, DOC_TYPE_RESUME};

#[test]
fn load_dir_builds_typed_documents() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("alice_resume.txt"), "Python developer, 5 years").unwrap();
    fs::write(dir.join("notes.md"), "not a corpus file").unwrap();

    let docs = load_dir(dir, DOC_TYPE_RESUME).expect("load");
    assert_eq!(docs.len(), 1, "only .txt files are loaded");
    assert_eq!(docs[0].id, "alice_resume.txt");
    assert_eq!(docs[0].doc_type(), DOC_TYPE_RESUME);
    assert_eq!(docs[0].metadata.get("filename").map(String::as_str), Some("alice_resume.txt"));
}

#[test]
fn load_dir_skips_files_that_clean_to_nothing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("empty.txt"), "  \n\t ***  \n").unwrap();
    fs::write(dir.join("real.txt"), "actual content").unwrap();

    let docs = load_dir(dir, DOC_TYPE_NOTE).expect("load");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "real.txt");
}

#[test]
fn load_dir_missing_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    let docs = load_dir(&tmp.path().join("does-not-exist"), DOC_TYPE_RESUME).expect("load");
    assert!(docs.is_empty());
}

#[test]
fn clean_text_collapses_and_strips() {
    let cleaned = clean_text("John  Doe\n\tPython, SQL!  (senior)");
    assert_eq!(cleaned, "John Doe Python, SQL senior");
}

#[test]
fn skills_query_synthesizes_semantic_text() {
    let mut skills = BTreeSet::new();
    skills.insert("AWS".to_string());
    skills.insert("Python".to_string());
    let q = Query::Skills { required_skills: skills.clone(), min_years: 5 };
    assert_eq!(q.semantic_text(), "AWS, Python, 5 years");

    let q0 = Query::Skills { required_skills: skills, min_years: 0 };
    assert_eq!(q0.semantic_text(), "AWS, Python");
}

#[test]
fn education_query_synthesizes_semantic_text() {
    let mut levels = BTreeSet::new();
    levels.insert(EducationLevel::Phd);
    levels.insert(EducationLevel::Masters);
    let q = Query::Education { levels };
    assert_eq!(q.semantic_text(), "candidates with masters, phd");
}

#[test]
fn only_general_queries_can_include_notes() {
    let jd = Query::JobDescription { text: "backend engineer".into() };
    assert!(!jd.include_notes());
    let general = Query::General { text: "team fit".into(), include_notes: true };
    assert!(general.include_notes());
    let general_off = Query::General { text: "team fit".into(), include_notes: false };
    assert!(!general_off.include_notes());
}

#[test]
fn education_levels_order_by_hierarchy() {
    assert!(EducationLevel::Phd > EducationLevel::Masters);
    assert!(EducationLevel::Masters > EducationLevel::Bachelors);
    assert_eq!(EducationLevel::DESCENDING[0], EducationLevel::Phd);
    assert_eq!("masters".parse::<EducationLevel>().unwrap(), EducationLevel::Masters);
    assert!("diploma".parse::<EducationLevel>().is_err());
}

#[test]
fn content_hash_tracks_text_changes() {
    let a = content_hash("some resume text");
    assert_eq!(a, content_hash("some resume text"));
    assert_ne!(a, content_hash("some resume text, edited"));
}

#[test]
fn document_constructors_set_metadata() {
    let doc = Document::note("n1.txt", "spoke with candidate");
    assert_eq!(doc.doc_type(), DOC_TYPE_NOTE);
    let doc = Document::resume("r1.txt", "engineer");
    assert_eq!(doc.doc_type(), DOC_TYPE_RESUME);
}
