use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Defaults ──────────────────────────────────────────────────

pub const DEFAULT_PDF_DIR: &str = "knowledge_base_pdfs";
pub const DEFAULT_STORE_PATH: &str = "vector_store";
pub const DEFAULT_COLLECTION: &str = "pdf_documents";
pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Smallest chunk size that still yields meaningful chunks.
pub const MIN_CHUNK_SIZE: usize = 100;

// ── Errors ────────────────────────────────────────────────────

/// Configuration problems rejected before any processing begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PDF directory does not exist: {0}")]
    MissingSourceDir(PathBuf),

    #[error("PDF path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("chunk size must be at least {MIN_CHUNK_SIZE} characters (got {0})")]
    ChunkSizeTooSmall(usize),

    #[error("chunk overlap ({overlap}) must be less than chunk size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },

    #[error("embedding batch size must be at least 1")]
    ZeroBatchSize,

    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("unknown embedding provider: {0}")]
    UnknownProvider(String),

    #[error("embedding provider '{0}' requires an API key")]
    MissingApiKey(String),
}

// ── Top-level config ──────────────────────────────────────────

/// Everything one indexing run needs, assembled before any work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory scanned (flat, non-recursive) for *.pdf files.
    pub pdf_dir: PathBuf,
    /// On-disk vector store location, owned wholesale by the pipeline.
    pub store_path: PathBuf,
    /// Collection name within the store.
    pub collection: String,
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap carried between adjacent chunks, must be < chunk_size.
    pub chunk_overlap: usize,
    /// Number of chunks embedded and written per batch.
    pub batch_size: usize,
    pub embedding: EmbeddingConfig,
}

impl IndexConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            pdf_dir: PathBuf::from(env_or("RAGDEX_PDF_DIR", DEFAULT_PDF_DIR)),
            store_path: PathBuf::from(env_or("RAGDEX_STORE_PATH", DEFAULT_STORE_PATH)),
            collection: env_or("RAGDEX_COLLECTION", DEFAULT_COLLECTION),
            chunk_size: env_usize("RAGDEX_CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
            chunk_overlap: env_usize("RAGDEX_CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP),
            batch_size: env_usize("RAGDEX_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            embedding: EmbeddingConfig::from_env(),
        }
    }

    /// Reject invalid configuration before the run performs any side effect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pdf_dir.exists() {
            return Err(ConfigError::MissingSourceDir(self.pdf_dir.clone()));
        }
        if !self.pdf_dir.is_dir() {
            return Err(ConfigError::NotADirectory(self.pdf_dir.clone()));
        }
        if self.chunk_size < MIN_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooSmall(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                chunk_size: self.chunk_size,
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        self.embedding.validate()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  pdf_dir:     {}", self.pdf_dir.display());
        tracing::info!(
            "  store:       {} (collection: {})",
            self.store_path.display(),
            self.collection
        );
        tracing::info!(
            "  chunking:    size={}, overlap={}, batch={}",
            self.chunk_size,
            self.chunk_overlap,
            self.batch_size
        );
        tracing::info!(
            "  embedding:   provider={}, dimensions={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
    }
}

// ── Embedding provider ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai".
    pub provider: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    /// Fixed output dimension every vector must match.
    pub dimensions: usize,
    /// Per-request timeout; expiry is treated like any other call failure.
    pub timeout_secs: u64,
    pub cache_capacity: usize,
}

impl EmbeddingConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env_or("EMBEDDING_PROVIDER", "ollama"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_EMBEDDING_MODEL", "all-minilm"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 384),
            timeout_secs: env_u64("EMBEDDING_TIMEOUT_SECS", 30),
            cache_capacity: env_usize("EMBEDDING_CACHE_CAPACITY", 2048),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.provider.as_str() {
            "ollama" => Ok(()),
            "openai" => {
                if self.openai_api_key.is_none() {
                    Err(ConfigError::MissingApiKey(self.provider.clone()))
                } else {
                    Ok(())
                }
            }
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}
