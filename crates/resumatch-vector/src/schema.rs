//! Arrow schema for the documents table.

use arrow_schema::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

/// Embedding dimensionality stored in the `vector` column.
pub const EMBEDDING_DIM: i32 = 384;

/// Default table name: one row per indexed document.
pub const DOCUMENTS_TABLE: &str = "documents";

pub fn build_arrow_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("doc_type", DataType::Utf8, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new("content_hash", DataType::Utf8, false),
        Field::new("indexed_at", DataType::Timestamp(TimeUnit::Millisecond, None), false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM,
            ),
            true,
        ),
    ]))
}
