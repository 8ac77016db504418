//! Corpus loading for cleaned resume and interview-note text files.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{Document, Meta, META_FILENAME, META_TYPE};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,]").expect("noise pattern"));

/// Collapse whitespace runs and strip characters other than word
/// characters, whitespace and `.`/`,`.
pub fn clean_text(text: &str) -> String {
    let flat = WHITESPACE.replace_all(text, " ");
    NOISE.replace_all(&flat, "").trim().to_string()
}

/// Load every `.txt` file under `dir` as a document of kind `doc_type`.
///
/// The file name is the document id. Files that clean down to nothing are
/// skipped; a missing directory yields an empty corpus.
pub fn load_dir(dir: &Path, doc_type: &str) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for path in list_txt_files(dir) {
        let raw = read_file_content(&path)?;
        let text = clean_text(&raw);
        if text.is_empty() {
            debug!(path = %path.display(), "skipping empty document");
            continue;
        }
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let mut metadata = Meta::new();
        metadata.insert(META_TYPE.to_string(), doc_type.to_string());
        metadata.insert(META_FILENAME.to_string(), id.clone());
        docs.push(Document { id, text, metadata });
    }
    debug!(dir = %dir.display(), doc_type, count = docs.len(), "loaded corpus");
    Ok(docs)
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}
