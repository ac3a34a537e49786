//! index-pdfs — build a fresh vector index from a directory of PDFs.
//!
//! Flow: reset store → scan *.pdf → extract text and tables → chunk with
//! overlap → embed in fixed-size batches → write to the vector store.
//!
//! Configuration comes from flags, environment variables (.env supported),
//! and defaults, in that order. Invalid configuration aborts before any
//! side effect; everything after validation is skip-and-continue.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use ragdex_core::config::{
    load_dotenv, DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_COLLECTION, DEFAULT_PDF_DIR, DEFAULT_STORE_PATH,
};
use ragdex_core::{EmbeddingConfig, IndexConfig};
use ragdex_ingest::document::pdf::PdfParser;
use ragdex_ingest::embedding::build_embedder;
use ragdex_ingest::{Indexer, PipelineError};
use ragdex_storage::SqliteVectorStore;

// ── CLI ─────────────────────────────────────────────────────────────

/// Index PDF files into a fresh vector store collection.
#[derive(Parser, Debug)]
#[command(name = "index-pdfs", version, about)]
struct Cli {
    /// Directory containing PDF files (flat, non-recursive).
    #[arg(long, env = "RAGDEX_PDF_DIR", default_value = DEFAULT_PDF_DIR)]
    pdf_dir: PathBuf,

    /// Output directory for the vector store.
    #[arg(long, env = "RAGDEX_STORE_PATH", default_value = DEFAULT_STORE_PATH)]
    store_path: PathBuf,

    /// Collection name within the store.
    #[arg(long, env = "RAGDEX_COLLECTION", default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Target chunk size in characters.
    #[arg(long, env = "RAGDEX_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Overlap between chunks in characters (must be < chunk size).
    #[arg(long, env = "RAGDEX_CHUNK_OVERLAP", default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,

    /// Chunks embedded and written per batch.
    #[arg(long, env = "RAGDEX_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = IndexConfig {
        pdf_dir: cli.pdf_dir,
        store_path: cli.store_path,
        collection: cli.collection,
        chunk_size: cli.chunk_size,
        chunk_overlap: cli.chunk_overlap,
        batch_size: cli.batch_size,
        embedding: EmbeddingConfig::from_env(),
    };
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let embedder = build_embedder(&config.embedding).context("embedding provider")?;
    let store = SqliteVectorStore::open(
        &config.store_path,
        &config.collection,
        config.embedding.dimensions,
    )
    .await
    .context("opening vector store")?;

    let mut indexer = Indexer::new(config, Arc::new(PdfParser), embedder, Arc::new(store));

    let cancel = indexer.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl-C received, stopping at the next batch boundary");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    match indexer.run().await {
        Ok(summary) => summary.log(),
        // An empty input directory is reported, not fatal to the process.
        Err(PipelineError::NoDocuments(dir)) => {
            error!("no PDF files found in {}", dir.display());
        }
        Err(e) => return Err(e).context("indexing run failed"),
    }

    info!("index-pdfs exited cleanly");
    Ok(())
}
