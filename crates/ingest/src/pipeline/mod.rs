//! Pipeline orchestration: reset, scan, and the per-document loop.
//!
//! Failure policy below configuration validation is skip-and-continue: a
//! document that fails to parse, a batch that fails to embed, and a batch
//! the store rejects are each logged and counted, never fatal. The store
//! is reset before the first write, so a completed run reflects exactly
//! the current input set and a cancelled run is a strict prefix of one.

mod collect;
mod ids;

pub use collect::collect_chunks;
pub use ids::ChunkIdAllocator;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use ragdex_core::{Chunk, IndexConfig};
use ragdex_storage::{StoreError, VectorStore};

use crate::document::chunker::{BoundaryRule, ChunkConfig, SentenceBoundary};
use crate::document::DocumentParser;
use crate::embedding::{Embedder, EmbeddingBatcher};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no PDF files found in {0}")]
    NoDocuments(PathBuf),

    #[error("failed to scan {dir}: {source}")]
    Scan {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("vector store reset failed: {0}")]
    Reset(#[from] StoreError),
}

/// Aggregated counts of one indexing run; the run's terminal report.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// PDF files found by the directory scan.
    pub documents_found: usize,
    /// Documents that contributed at least one written chunk.
    pub documents_indexed: usize,
    /// Documents skipped because extraction failed.
    pub documents_failed: usize,
    /// Chunks produced by extraction and chunking.
    pub chunks_produced: usize,
    /// Chunks actually persisted to the store.
    pub chunks_written: usize,
    /// Batches dropped after an embedding or store failure.
    pub batches_failed: usize,
    pub duration: Duration,
    /// Set when a cancellation request stopped the run early.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn log(&self) {
        info!("Indexing complete:");
        info!(
            "  documents: {} found, {} indexed, {} failed",
            self.documents_found, self.documents_indexed, self.documents_failed
        );
        info!(
            "  chunks:    {} written (of {} produced)",
            self.chunks_written, self.chunks_produced
        );
        info!("  batches:   {} failed", self.batches_failed);
        info!("  duration:  {:.2?}", self.duration);
        if self.cancelled {
            warn!("run cancelled; the store holds a prefix of the full run");
        }
    }
}

/// Sequences one indexing run: reset the store, scan the source directory,
/// then per document extract, chunk, embed, and write.
///
/// Callers validate the [`IndexConfig`] before constructing the indexer;
/// nothing here re-checks it.
pub struct Indexer {
    config: IndexConfig,
    parser: Arc<dyn DocumentParser>,
    batcher: EmbeddingBatcher,
    store: Arc<dyn VectorStore>,
    boundary: Box<dyn BoundaryRule>,
    cancel: Arc<AtomicBool>,
}

impl Indexer {
    pub fn new(
        config: IndexConfig,
        parser: Arc<dyn DocumentParser>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let batcher = EmbeddingBatcher::new(
            embedder,
            config.batch_size,
            config.embedding.cache_capacity,
        );
        Self {
            config,
            parser,
            batcher,
            store,
            boundary: Box::new(SentenceBoundary),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Swap the sentence-boundary heuristic for another rule.
    pub fn with_boundary_rule(mut self, rule: Box<dyn BoundaryRule>) -> Self {
        self.boundary = rule;
        self
    }

    /// Cancellation flag, checked at document and batch boundaries only.
    /// Batches already written when the flag is set stay persisted.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();

        // Wipe the previous run before anything else touches the store.
        self.store.reset().await?;

        let pdf_files = scan_pdfs(&self.config.pdf_dir)?;
        if pdf_files.is_empty() {
            return Err(PipelineError::NoDocuments(self.config.pdf_dir.clone()));
        }
        info!(
            count = pdf_files.len(),
            dir = %self.config.pdf_dir.display(),
            "found PDF files"
        );

        let mut summary = RunSummary {
            documents_found: pdf_files.len(),
            ..Default::default()
        };
        let chunk_config = ChunkConfig {
            target_size: self.config.chunk_size,
            overlap: self.config.chunk_overlap,
        };
        let mut ids = ChunkIdAllocator::new();

        for path in &pdf_files {
            if self.cancel.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }
            info!(file = %path.display(), "processing document");

            let doc = match self.parser.parse(path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "extraction failed, skipping document");
                    summary.documents_failed += 1;
                    continue;
                }
            };

            let chunks = collect_chunks(&doc, &chunk_config, self.boundary.as_ref(), &mut ids);
            if chunks.is_empty() {
                warn!(file = %doc.filename, "no content extracted");
                continue;
            }
            summary.chunks_produced += chunks.len();

            let written = self.write_chunks(&chunks, &mut summary).await;
            if written > 0 {
                summary.documents_indexed += 1;
                summary.chunks_written += written;
            }
            info!(file = %doc.filename, chunks = written, "indexed document");
        }

        let (cache_hits, cache_misses) = self.batcher.cache_stats();
        info!(hits = cache_hits, misses = cache_misses, "embedding cache");

        summary.duration = started.elapsed();
        Ok(summary)
    }

    /// Embed and persist one document's chunks in fixed-size batches.
    /// Returns how many chunks reached the store.
    async fn write_chunks(&mut self, chunks: &[Chunk], summary: &mut RunSummary) -> usize {
        let mut written = 0;

        for window in chunks.chunks(self.batcher.batch_size()) {
            if self.cancel.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }

            let texts: Vec<&str> = window.iter().map(|c| c.text.as_str()).collect();
            let vectors = match self.batcher.embed_window(&texts).await {
                Ok(vectors) => vectors,
                Err(e) => {
                    warn!(error = %e, size = window.len(), "embedding failed, dropping batch");
                    summary.batches_failed += 1;
                    continue;
                }
            };

            let ids: Vec<String> = window.iter().map(|c| c.id.clone()).collect();
            let documents: Vec<String> = window.iter().map(|c| c.text.clone()).collect();
            let metadatas: Vec<serde_json::Value> = window
                .iter()
                .map(|c| serde_json::to_value(&c.metadata).unwrap_or_default())
                .collect();

            match self
                .store
                .add_batch(&ids, &vectors, &documents, &metadatas)
                .await
            {
                Ok(()) => written += window.len(),
                Err(e) => {
                    warn!(error = %e, size = window.len(), "store write failed, dropping batch");
                    summary.batches_failed += 1;
                }
            }
        }

        written
    }
}

/// Flat, non-recursive scan for `*.pdf` files, sorted by path so runs over
/// identical input process documents in the same order.
fn scan_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let entries = std::fs::read_dir(dir).map_err(|source| PipelineError::Scan {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
