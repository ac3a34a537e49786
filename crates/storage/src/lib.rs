//! Vector persistence for the indexing pipeline.
//!
//! The pipeline talks to storage through the narrow [`VectorStore`] trait
//! so tests can substitute an in-memory fake without touching pipeline
//! logic. The shipped backend is [`sqlite::SqliteVectorStore`].

pub mod error;
pub mod sqlite;

use async_trait::async_trait;

pub use error::StoreError;
pub use sqlite::SqliteVectorStore;

/// One persisted `(id, vector, text, metadata)` tuple.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub document: String,
    pub metadata: serde_json::Value,
}

/// Write-side seam over the vector store.
///
/// A store instance targets exactly one named collection; the collection
/// is the unit of lifecycle and is recreated fresh by [`reset`] at the
/// start of each indexing run.
///
/// [`reset`]: VectorStore::reset
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Wipe the collection's persisted data and recreate it empty.
    /// Idempotent; safe to call on a store that was never written.
    async fn reset(&self) -> Result<(), StoreError>;

    /// Persist one batch of entries. The four slices are parallel and must
    /// have equal length; the write is all-or-nothing per batch.
    async fn add_batch(
        &self,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
        metadatas: &[serde_json::Value],
    ) -> Result<(), StoreError>;

    /// Total number of entries currently persisted in the collection.
    async fn count(&self) -> Result<usize, StoreError>;
}
