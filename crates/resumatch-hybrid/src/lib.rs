//! Weighted fusion of semantic similarity with rule-based sub-scores, and
//! the orchestrator that runs one query end to end: embed, retrieve the
//! candidate pool, apply the variant's sub-scorers, fuse, sort, rank.

use std::cmp::Ordering;

use anyhow::Result;
use tracing::debug;

use resumatch_core::traits::{Embedder, VectorIndex};
use resumatch_core::types::{
    content_hash, ComponentScores, Document, IndexEntry, IndexHit, Query, ScoredResult,
    DOC_TYPE_RESUME,
};
use resumatch_match::skills::{experience_score, skills_score};
use resumatch_match::{ConfidenceWeights, EducationMatcher};

/// Fusion weights applied to the rule-based sub-scores. The defaults
/// preserve the production values and are pending recalibration alongside
/// [`ConfidenceWeights`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { skills: 0.3, experience: 0.2, education: 0.4 }
    }
}

/// The hybrid matching engine: embedder + vector index + rule matchers.
///
/// Synchronous and re-entrant; one instance serves any number of worker
/// threads. Indexing and querying may run concurrently — the index's
/// snapshot guarantee keeps reads consistent.
pub struct MatchEngine<I: VectorIndex> {
    index: I,
    embedder: Box<dyn Embedder>,
    weights: ScoreWeights,
    education: EducationMatcher,
}

impl<I: VectorIndex> MatchEngine<I> {
    pub fn new(index: I, embedder: Box<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            weights: ScoreWeights::default(),
            education: EducationMatcher::new(),
        }
    }

    pub fn with_weights(
        index: I,
        embedder: Box<dyn Embedder>,
        weights: ScoreWeights,
        confidence: ConfidenceWeights,
    ) -> Self {
        Self { index, embedder, weights, education: EducationMatcher::with_weights(confidence) }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Embed and upsert `docs`, skipping documents whose text is unchanged
    /// since the last indexing run. Returns the number written.
    pub fn index_documents(&self, docs: &[Document]) -> Result<usize> {
        let known = self.index.content_hashes()?;
        let todo: Vec<&Document> = docs
            .iter()
            .filter(|d| known.get(&d.id) != Some(&content_hash(&d.text)))
            .collect();
        if todo.is_empty() {
            debug!(total = docs.len(), "all documents unchanged; nothing to index");
            return Ok(0);
        }
        let texts: Vec<String> = todo.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        let entries: Vec<IndexEntry> = todo
            .iter()
            .zip(vectors)
            .map(|(d, vector)| IndexEntry {
                id: d.id.clone(),
                vector,
                text: d.text.clone(),
                metadata: d.metadata.clone(),
            })
            .collect();
        self.index.upsert(&entries)?;
        debug!(written = entries.len(), skipped = docs.len() - entries.len(), "indexed documents");
        Ok(entries.len())
    }

    /// Drop a document from the index; no-op when absent.
    pub fn remove_document(&self, id: &str) -> Result<()> {
        self.index.remove(id)
    }

    /// Run one query to completion. Results come back sorted descending by
    /// final score (ties ascending by id) with 1-based ranks assigned.
    pub fn search(&self, query: &Query, top_k: usize) -> Result<Vec<ScoredResult>> {
        if top_k == 0 {
            return Ok(vec![]);
        }
        let query_text = query.semantic_text();
        let query_vec = self.embedder.embed(&query_text)?;
        let doc_type = if query.include_notes() { None } else { Some(DOC_TYPE_RESUME) };
        let pool = self.index.query(&query_vec, top_k, doc_type)?;
        debug!(pool = pool.len(), top_k, "retrieved candidate pool");

        let mut results: Vec<ScoredResult> =
            pool.into_iter().filter_map(|hit| self.score(query, hit)).collect();
        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(top_k);
        for (position, result) in results.iter_mut().enumerate() {
            result.rank = position + 1;
        }
        Ok(results)
    }

    /// Score one candidate. `None` drops it: education queries reject any
    /// candidate whose resolved level is outside the target set, even when
    /// the raw text contains a target-level token.
    fn score(&self, query: &Query, hit: IndexHit) -> Option<ScoredResult> {
        let semantic = 1.0 - hit.distance;
        let mut components = ComponentScores { semantic, ..ComponentScores::default() };
        let final_score = match query {
            Query::JobDescription { .. } | Query::General { .. } => semantic,
            Query::Skills { required_skills, min_years } => {
                let skills = skills_score(&hit.text, required_skills);
                let experience = experience_score(&hit.text, *min_years);
                components.skills = Some(skills);
                components.experience = Some(experience);
                semantic + self.weights.skills * skills + self.weights.experience * experience
            }
            Query::Education { levels } => {
                let resolved = self.education.resolve(&hit.text)?;
                if !levels.contains(&resolved.level) {
                    return None;
                }
                components.education = Some(resolved.confidence);
                semantic + self.weights.education * resolved.confidence
            }
        };
        Some(ScoredResult {
            id: hit.id,
            final_score,
            components,
            rank: 0,
            text: hit.text,
            metadata: hit.metadata,
        })
    }
}
