pub mod chunk;
pub mod config;

pub use chunk::{Chunk, ChunkMetadata, ContentKind};
pub use config::{ConfigError, EmbeddingConfig, IndexConfig};
