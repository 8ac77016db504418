use std::collections::HashMap;

use crate::types::{DocId, IndexEntry, IndexHit};

/// Maps text to fixed-length L2-normalized vectors.
///
/// Implementations load any model state once and treat it as read-only
/// afterwards, so calls are safe from any number of threads. Identical
/// input text yields identical vectors.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model (e.g. `minilm-l6:d384`).
    fn id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Maximum token length accepted per text.
    fn max_len(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut batch = self.embed_batch(&[text.to_string()])?;
        batch.pop().ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}

/// Durable id -> (vector, text, metadata) store answering nearest-neighbour
/// queries.
///
/// Writes serialize against each other; reads may run concurrently and see
/// either the pre- or post-write state of an entry, never a torn one.
pub trait VectorIndex: Send + Sync {
    /// Insert or replace entries by id. Idempotent; last write wins.
    fn upsert(&self, entries: &[IndexEntry]) -> anyhow::Result<()>;

    /// Delete an entry; no-op when absent.
    fn remove(&self, id: &str) -> anyhow::Result<()>;

    /// The `top_k` nearest entries by cosine distance, ascending. A
    /// `doc_type` filter restricts candidates to that document kind.
    /// `top_k` larger than the index is clamped; `0` yields an empty
    /// result.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        doc_type: Option<&str>,
    ) -> anyhow::Result<Vec<IndexHit>>;

    /// id -> content hash of the stored text, for skip-unchanged indexing.
    fn content_hashes(&self) -> anyhow::Result<HashMap<DocId, String>>;

    /// Stored (id, doc_type) pairs, optionally restricted to one kind.
    fn list(&self, doc_type: Option<&str>) -> anyhow::Result<Vec<(DocId, String)>>;

    /// Number of stored entries.
    fn len(&self) -> anyhow::Result<usize>;
}
