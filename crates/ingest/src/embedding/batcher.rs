//! Fixed-size batching over the embedding provider.

use std::sync::Arc;

use super::cache::EmbeddingCache;
use super::traits::{Embedder, EmbeddingError};

/// Embeds chunk text in fixed-size windows, preserving input order.
///
/// Each window is one provider call, bounding peak memory and request
/// size. Cached texts are served without a provider round-trip; only the
/// misses go out. The provider must return exactly one vector per input,
/// each of the declared dimension; anything else fails the whole window so
/// the caller can drop it and move on.
pub struct EmbeddingBatcher {
    embedder: Arc<dyn Embedder>,
    cache: EmbeddingCache,
    batch_size: usize,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, cache_capacity: usize) -> Self {
        Self {
            embedder,
            cache: EmbeddingCache::new(cache_capacity),
            batch_size,
        }
    }

    /// Window size callers should slice their chunk list by.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// `(hits, misses)` from the embedding cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }

    /// Embed one window of texts, returning one vector per input in order.
    pub async fn embed_window(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut resolved: Vec<(usize, Vec<f32>)> = Vec::with_capacity(texts.len());
        let mut miss_indexes: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(text) {
                Some(vector) => resolved.push((i, vector)),
                None => miss_indexes.push(i),
            }
        }

        if !miss_indexes.is_empty() {
            let miss_texts: Vec<&str> = miss_indexes.iter().map(|&i| texts[i]).collect();
            let fresh = self.embedder.embed_batch(&miss_texts).await?;

            if fresh.len() != miss_texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: miss_texts.len(),
                    actual: fresh.len(),
                });
            }
            let dims = self.embedder.dimensions();
            for vector in &fresh {
                if vector.len() != dims {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: dims,
                        actual: vector.len(),
                    });
                }
            }

            for (&i, vector) in miss_indexes.iter().zip(fresh) {
                self.cache.put(texts[i], vector.clone());
                resolved.push((i, vector));
            }
        }

        resolved.sort_by_key(|(i, _)| *i);
        Ok(resolved.into_iter().map(|(_, vector)| vector).collect())
    }
}
