use tempfile::TempDir;

use resumatch_core::traits::{Embedder, VectorIndex};
use resumatch_core::types::{content_hash, Document, IndexEntry, DOC_TYPE_RESUME};
use resumatch_embed::HashEmbedder;
use resumatch_vector::{schema::DOCUMENTS_TABLE, LanceIndex};

fn entries(embedder: &HashEmbedder, docs: &[Document]) -> Vec<IndexEntry> {
    docs.iter()
        .map(|d| IndexEntry {
            id: d.id.clone(),
            vector: embedder.embed(&d.text).expect("embed"),
            text: d.text.clone(),
            metadata: d.metadata.clone(),
        })
        .collect()
}

#[test]
fn lance_index_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    let index = LanceIndex::open(tmp.path(), DOCUMENTS_TABLE).expect("open");
    let embedder = HashEmbedder::default();

    let docs = vec![
        Document::resume("a.txt", "Rust systems programming, 6 years"),
        Document::resume("b.txt", "Python data science and pipelines"),
        Document::note("n.txt", "strong communicator in the interview"),
    ];
    let batch = entries(&embedder, &docs);
    index.upsert(&batch).expect("upsert");
    assert_eq!(index.len().expect("len"), 3);

    // Re-upserting the same ids replaces rather than duplicates.
    index.upsert(&batch).expect("re-upsert");
    assert_eq!(index.len().expect("len"), 3);

    // Querying with a stored vector returns that document first, at ~0.
    let hits = index.query(&batch[0].vector, 2, None).expect("query");
    assert_eq!(hits[0].id, "a.txt");
    assert!(hits[0].distance.abs() < 1e-3, "distance = {}", hits[0].distance);
    assert_eq!(hits[0].text, "Rust systems programming, 6 years");

    // The doc_type filter keeps interview notes out of the pool.
    let resumes_only = index.query(&batch[2].vector, 10, Some(DOC_TYPE_RESUME)).expect("query");
    assert!(resumes_only.iter().all(|h| h.doc_type() == DOC_TYPE_RESUME));

    // Oversized top_k clamps; zero yields nothing.
    assert!(index.query(&batch[0].vector, 0, None).expect("query").is_empty());
    assert!(index.query(&batch[0].vector, 50, None).expect("query").len() <= 3);

    // Content hashes reflect the stored text.
    let hashes = index.content_hashes().expect("hashes");
    assert_eq!(hashes.get("a.txt"), Some(&content_hash("Rust systems programming, 6 years")));

    // Listing filters by kind.
    let listed = index.list(Some(DOC_TYPE_RESUME)).expect("list");
    assert_eq!(listed.len(), 2);

    // Remove deletes, and removing a missing id is a no-op.
    index.remove("b.txt").expect("remove");
    assert_eq!(index.len().expect("len"), 2);
    index.remove("missing.txt").expect("remove absent");
    assert_eq!(index.len().expect("len"), 2);
}

#[test]
fn lance_index_persists_across_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let embedder = HashEmbedder::default();
    let docs = vec![Document::resume("keep.txt", "kept across restarts")];
    let batch = entries(&embedder, &docs);

    {
        let index = LanceIndex::open(tmp.path(), DOCUMENTS_TABLE).expect("open");
        index.upsert(&batch).expect("upsert");
    }

    let reopened = LanceIndex::open(tmp.path(), DOCUMENTS_TABLE).expect("reopen");
    assert_eq!(reopened.len().expect("len"), 1);
    let hits = reopened.query(&batch[0].vector, 1, None).expect("query");
    assert_eq!(hits[0].id, "keep.txt");
}
