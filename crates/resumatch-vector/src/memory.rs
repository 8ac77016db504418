//! In-memory vector index with the same trait surface as the Lance store.
//!
//! Exact-scan cosine distance over a `BTreeMap` behind a read-write lock:
//! writes serialize, reads run concurrently and only ever see complete
//! entries. Intended for tests and small corpora.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use parking_lot::RwLock;

use resumatch_core::traits::VectorIndex;
use resumatch_core::types::{content_hash, DocId, IndexEntry, IndexHit, DOC_TYPE_RESUME, META_TYPE};

#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<BTreeMap<DocId, IndexEntry>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

fn entry_doc_type(entry: &IndexEntry) -> &str {
    entry.metadata.get(META_TYPE).map_or(DOC_TYPE_RESUME, String::as_str)
}

impl VectorIndex for MemoryIndex {
    fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        let mut guard = self.entries.write();
        for entry in entries {
            guard.insert(entry.id.clone(), entry.clone());
        }
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.entries.write().remove(id);
        Ok(())
    }

    fn query(&self, vector: &[f32], top_k: usize, doc_type: Option<&str>) -> Result<Vec<IndexHit>> {
        if top_k == 0 {
            return Ok(vec![]);
        }
        let guard = self.entries.read();
        let mut hits: Vec<IndexHit> = guard
            .values()
            .filter(|e| doc_type.map_or(true, |t| entry_doc_type(e) == t))
            .map(|e| IndexHit {
                id: e.id.clone(),
                text: e.text.clone(),
                metadata: e.metadata.clone(),
                distance: cosine_distance(vector, &e.vector),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    fn content_hashes(&self) -> Result<HashMap<DocId, String>> {
        let guard = self.entries.read();
        Ok(guard.values().map(|e| (e.id.clone(), content_hash(&e.text))).collect())
    }

    fn list(&self, doc_type: Option<&str>) -> Result<Vec<(DocId, String)>> {
        let guard = self.entries.read();
        Ok(guard
            .values()
            .filter(|e| doc_type.map_or(true, |t| entry_doc_type(e) == t))
            .map(|e| (e.id.clone(), entry_doc_type(e).to_string()))
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}
