//! Embedding providers, batching, and the per-run vector cache.

pub mod batcher;
pub mod cache;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use ragdex_core::{ConfigError, EmbeddingConfig};

pub use batcher::EmbeddingBatcher;
pub use cache::EmbeddingCache;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the configured embedding provider.
///
/// `config` is expected to have passed validation; an unknown provider or
/// a missing key still surfaces as the matching `ConfigError` rather than
/// a panic.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, ConfigError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            config.dimensions,
            timeout,
        ))),
        "openai" => match &config.openai_api_key {
            Some(api_key) => Ok(Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.dimensions,
                timeout,
            ))),
            None => Err(ConfigError::MissingApiKey(config.provider.clone())),
        },
        other => Err(ConfigError::UnknownProvider(other.to_string())),
    }
}
