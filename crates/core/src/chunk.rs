use serde::{Deserialize, Serialize};

/// Content kind of an indexed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Table,
}

/// Metadata persisted alongside every chunk, enabling filtering and
/// citation at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document filename.
    pub source: String,
    /// 1-based page number.
    pub page: usize,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Position of this text chunk on its page (text chunks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks_on_page: Option<usize>,
    /// Which table on the page (table chunks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
}

impl ChunkMetadata {
    pub fn text(source: &str, page: usize, chunk_index: usize, total_chunks_on_page: usize) -> Self {
        Self {
            source: source.to_string(),
            page,
            kind: ContentKind::Text,
            chunk_index: Some(chunk_index),
            total_chunks_on_page: Some(total_chunks_on_page),
            table_index: None,
        }
    }

    pub fn table(source: &str, page: usize, table_index: usize) -> Self {
        Self {
            source: source.to_string(),
            page,
            kind: ContentKind::Table,
            chunk_index: None,
            total_chunks_on_page: None,
            table_index: Some(table_index),
        }
    }
}

/// A unit of indexable text with its run-stable id and metadata.
///
/// Chunks are produced by the extraction stage, consumed once by the
/// embedding batcher, then handed to the index writer.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: String,
    /// Non-empty text content.
    pub text: String,
    pub metadata: ChunkMetadata,
}
