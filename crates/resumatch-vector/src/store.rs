//! LanceDB-backed durable vector index.
//!
//! LanceDB tables are versioned: a query runs against the table version
//! open at call time, so reads never observe a half-applied write. Writes
//! go through `merge_insert` keyed on `id`, which makes `upsert`
//! idempotent and last-write-wins. The async client is bridged behind a
//! store-owned tokio runtime so the trait surface stays synchronous.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arrow_array::{
    Float32Array, RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray,
};
use arrow_array::types::Float32Type;
use arrow_array::FixedSizeListArray;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use tracing::debug;

use resumatch_core::error::Error;
use resumatch_core::traits::VectorIndex;
use resumatch_core::types::{
    content_hash, DocId, IndexEntry, IndexHit, DOC_TYPE_RESUME, META_TYPE,
};

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};

pub struct LanceIndex {
    db: Connection,
    table_name: String,
    rt: tokio::runtime::Runtime,
}

impl LanceIndex {
    /// Open (or create) the store at `path`. Fails with
    /// [`Error::IndexUnavailable`] when the directory cannot be opened or
    /// the table cannot be created; fatal for both read and write paths.
    pub fn open(path: &Path, table_name: &str) -> Result<Self> {
        let rt = tokio::runtime::Runtime::new()?;
        let uri = path.to_string_lossy().to_string();
        let db = rt
            .block_on(async { connect(&uri).execute().await })
            .map_err(|e| Error::IndexUnavailable(format!("open {uri}: {e}")))?;
        let index = Self { db, table_name: table_name.to_string(), rt };
        index
            .rt
            .block_on(index.ensure_table())
            .map_err(|e| Error::IndexUnavailable(format!("table {table_name}: {e}")))?;
        Ok(index)
    }

    async fn ensure_table(&self) -> Result<()> {
        let names = self.db.table_names().execute().await?;
        if names.contains(&self.table_name) {
            return Ok(());
        }
        let schema = build_arrow_schema();
        let iter = RecordBatchIterator::new(vec![].into_iter(), schema);
        self.db.create_table(&self.table_name, Box::new(iter)).execute().await?;
        debug!(table = %self.table_name, "created documents table");
        Ok(())
    }
}

impl VectorIndex for LanceIndex {
    fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let batch = entries_to_record_batch(entries)?;
        let schema = batch.schema();
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
            let mut mi = table.merge_insert(&["id"]);
            mi.when_matched_update_all(None).when_not_matched_insert_all();
            let _ = mi.execute(reader).await?;
            debug!(table = %self.table_name, count = entries.len(), "upserted entries");
            Ok(())
        })
    }

    fn remove(&self, id: &str) -> Result<()> {
        let predicate = format!("id = '{}'", id.replace('\'', "''"));
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            table.delete(&predicate).await?;
            debug!(table = %self.table_name, id, "removed entry");
            Ok(())
        })
    }

    fn query(&self, vector: &[f32], top_k: usize, doc_type: Option<&str>) -> Result<Vec<IndexHit>> {
        if top_k == 0 {
            return Ok(vec![]);
        }
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let mut query = table
                .vector_search(vector.to_vec())?
                .distance_type(DistanceType::Cosine)
                .limit(top_k);
            if let Some(kind) = doc_type {
                query = query.only_if(format!("doc_type = '{}'", kind.replace('\'', "''")));
            }
            let mut stream = query.execute().await?;

            let mut hits = Vec::new();
            while let Some(batch) = stream.try_next().await? {
                for row in 0..batch.num_rows() {
                    let metadata = serde_json::from_str(&string_value(&batch, "metadata", row)?)
                        .unwrap_or_default();
                    hits.push(IndexHit {
                        id: string_value(&batch, "id", row)?,
                        text: string_value(&batch, "content", row)?,
                        metadata,
                        distance: float_value(&batch, "_distance", row).unwrap_or(1.0),
                    });
                }
            }
            // Ascending distance, ties by id, so identical queries against
            // an unchanged table return identical orderings.
            hits.sort_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            });
            hits.truncate(top_k);
            Ok(hits)
        })
    }

    fn content_hashes(&self) -> Result<HashMap<DocId, String>> {
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let mut stream = table.query().execute().await?;
            let mut out = HashMap::new();
            while let Some(batch) = stream.try_next().await? {
                for row in 0..batch.num_rows() {
                    out.insert(
                        string_value(&batch, "id", row)?,
                        string_value(&batch, "content_hash", row)?,
                    );
                }
            }
            Ok(out)
        })
    }

    fn list(&self, doc_type: Option<&str>) -> Result<Vec<(DocId, String)>> {
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let mut query = table.query();
            if let Some(kind) = doc_type {
                query = query.only_if(format!("doc_type = '{}'", kind.replace('\'', "''")));
            }
            let mut stream = query.execute().await?;
            let mut out = Vec::new();
            while let Some(batch) = stream.try_next().await? {
                for row in 0..batch.num_rows() {
                    out.push((
                        string_value(&batch, "id", row)?,
                        string_value(&batch, "doc_type", row)?,
                    ));
                }
            }
            out.sort();
            Ok(out)
        })
    }

    fn len(&self) -> Result<usize> {
        self.rt.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            Ok(table.count_rows(None).await?)
        })
    }
}

fn entries_to_record_batch(entries: &[IndexEntry]) -> Result<RecordBatch> {
    let mut ids = Vec::new();
    let mut doc_types = Vec::new();
    let mut contents = Vec::new();
    let mut metadatas = Vec::new();
    let mut hashes = Vec::new();
    let mut stamps = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    let now = Utc::now().timestamp_millis();
    for entry in entries {
        anyhow::ensure!(
            entry.vector.len() == EMBEDDING_DIM as usize,
            "entry {} has vector dim {}, expected {EMBEDDING_DIM}",
            entry.id,
            entry.vector.len()
        );
        ids.push(entry.id.clone());
        doc_types.push(
            entry
                .metadata
                .get(META_TYPE)
                .cloned()
                .unwrap_or_else(|| DOC_TYPE_RESUME.to_string()),
        );
        contents.push(entry.text.clone());
        metadatas.push(serde_json::to_string(&entry.metadata)?);
        hashes.push(content_hash(&entry.text));
        stamps.push(now);
        vectors.push(Some(entry.vector.iter().map(|&x| Some(x)).collect()));
    }
    let batch = RecordBatch::try_new(
        build_arrow_schema(),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(doc_types)),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(metadatas)),
            Arc::new(StringArray::from(hashes)),
            Arc::new(TimestampMillisecondArray::from(stamps)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
                vectors.into_iter(),
                EMBEDDING_DIM,
            )),
        ],
    )?;
    Ok(batch)
}

fn string_value(batch: &RecordBatch, column: &str, row: usize) -> Result<String> {
    let col = batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow::anyhow!("column '{column}' missing or not utf8"))?;
    Ok(col.value(row).to_string())
}

fn float_value(batch: &RecordBatch, column: &str, row: usize) -> Option<f32> {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .map(|c| c.value(row))
}
