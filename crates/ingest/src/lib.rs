//! Document ingestion pipeline: extraction, chunking, embedding, indexing.
//!
//! ```text
//! pdf_dir ──► document::pdf (text + tables per page)
//!                 │
//!                 ├─► document::table  (grid → "[TABLE] …" text)
//!                 └─► document::chunker (overlapping sentence chunks)
//!                           │
//!                 pipeline::collect_chunks + ChunkIdAllocator
//!                           │
//!                 embedding::EmbeddingBatcher (fixed-size windows)
//!                           │
//!                 ragdex_storage::VectorStore (batched writes)
//! ```

pub mod document;
pub mod embedding;
pub mod pipeline;

pub use pipeline::{Indexer, PipelineError, RunSummary};
