//! Domain types shared by the matcher, embedding and index crates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

pub type DocId = String;
pub type Meta = HashMap<String, String>;

/// Metadata key carrying the document kind.
pub const META_TYPE: &str = "type";
/// Metadata key carrying the source filename.
pub const META_FILENAME: &str = "filename";
/// Document kind for candidate resumes.
pub const DOC_TYPE_RESUME: &str = "resume";
/// Document kind for interview notes.
pub const DOC_TYPE_NOTE: &str = "note";

/// A document supplied by the ingestion collaborator.
///
/// - `id`: unique, stable identifier (typically the source filename)
/// - `text`: cleaned text payload
/// - `metadata`: free-form string map; `metadata["type"]` is `"resume"`
///   or `"note"`
///
/// Immutable once indexed; re-indexing the same `id` replaces the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    pub metadata: Meta,
}

impl Document {
    pub fn new(id: impl Into<DocId>, text: impl Into<String>, metadata: Meta) -> Self {
        Self { id: id.into(), text: text.into(), metadata }
    }

    /// A resume document with the standard metadata.
    pub fn resume(id: impl Into<DocId>, text: impl Into<String>) -> Self {
        Self::typed(id, text, DOC_TYPE_RESUME)
    }

    /// An interview-note document with the standard metadata.
    pub fn note(id: impl Into<DocId>, text: impl Into<String>) -> Self {
        Self::typed(id, text, DOC_TYPE_NOTE)
    }

    fn typed(id: impl Into<DocId>, text: impl Into<String>, doc_type: &str) -> Self {
        let id = id.into();
        let mut metadata = Meta::new();
        metadata.insert(META_TYPE.to_string(), doc_type.to_string());
        metadata.insert(META_FILENAME.to_string(), id.clone());
        Self { id, text: text.into(), metadata }
    }

    /// Document kind; absent metadata defaults to `"resume"`.
    pub fn doc_type(&self) -> &str {
        self.metadata.get(META_TYPE).map_or(DOC_TYPE_RESUME, String::as_str)
    }
}

/// What the vector index persists per document: one entry per id,
/// last write wins on re-index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: DocId,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: Meta,
}

/// A nearest-neighbour hit. `distance` is cosine distance over normalized
/// vectors: 0 = identical direction, 2 = opposite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexHit {
    pub id: DocId,
    pub text: String,
    pub metadata: Meta,
    pub distance: f32,
}

impl IndexHit {
    pub fn doc_type(&self) -> &str {
        self.metadata.get(META_TYPE).map_or(DOC_TYPE_RESUME, String::as_str)
    }
}

/// Education levels, orderable by hierarchy: `Bachelors < Masters < Phd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Bachelors,
    Masters,
    Phd,
}

impl EducationLevel {
    /// All levels, highest first.
    pub const DESCENDING: [EducationLevel; 3] =
        [EducationLevel::Phd, EducationLevel::Masters, EducationLevel::Bachelors];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Phd => "phd",
            EducationLevel::Masters => "masters",
            EducationLevel::Bachelors => "bachelors",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EducationLevel {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phd" | "doctorate" => Ok(EducationLevel::Phd),
            "masters" | "master" => Ok(EducationLevel::Masters),
            "bachelors" | "bachelor" => Ok(EducationLevel::Bachelors),
            other => Err(crate::error::Error::InvalidConfig(format!(
                "unknown education level: {other}"
            ))),
        }
    }
}

/// One education mention resolved for a document: the level, how confident
/// the matcher is in it, the keyword instances that produced it and the
/// section snippet they were judged against. A document resolves to at most
/// one of these per evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationMatch {
    pub level: EducationLevel,
    pub confidence: f32,
    pub keywords: Vec<String>,
    pub context: String,
}

/// The four search operations. Exactly one variant is active per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Query {
    JobDescription { text: String },
    Skills { required_skills: BTreeSet<String>, min_years: u32 },
    Education { levels: BTreeSet<EducationLevel> },
    General { text: String, include_notes: bool },
}

impl Query {
    /// The text handed to the embedder for candidate retrieval. Structured
    /// variants synthesize one by joining their fields.
    pub fn semantic_text(&self) -> String {
        match self {
            Query::JobDescription { text } | Query::General { text, .. } => text.clone(),
            Query::Skills { required_skills, min_years } => {
                let joined = required_skills.iter().cloned().collect::<Vec<_>>().join(", ");
                if *min_years > 0 {
                    format!("{joined}, {min_years} years")
                } else {
                    joined
                }
            }
            Query::Education { levels } => {
                let joined =
                    levels.iter().map(EducationLevel::as_str).collect::<Vec<_>>().join(", ");
                format!("candidates with {joined}")
            }
        }
    }

    /// Whether interview notes may appear in the candidate pool.
    pub fn include_notes(&self) -> bool {
        matches!(self, Query::General { include_notes: true, .. })
    }
}

/// Per-candidate sub-scores; which of the optional ones are present depends
/// on the query variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub semantic: f32,
    pub skills: Option<f32>,
    pub experience: Option<f32>,
    pub education: Option<f32>,
}

/// One ranked search result. Constructed per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub id: DocId,
    pub final_score: f32,
    pub components: ComponentScores,
    /// 1-based position, assigned after the final sort.
    pub rank: usize,
    pub text: String,
    pub metadata: Meta,
}

/// Blake3 hex digest of a document's text. The indexing pipeline compares
/// these against the store to skip re-embedding unchanged documents.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
