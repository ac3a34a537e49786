//! LRU cache for chunk embeddings.
//!
//! Pages repeat boilerplate (headers, footers, table headings), and the
//! overlap regions of adjacent chunks share text; caching by text avoids
//! re-embedding identical strings within a run.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;

/// Maps hashed chunk text to its embedding vector.
pub struct EmbeddingCache {
    entries: LruCache<u64, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn key(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up a cached embedding for `text`.
    pub fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        match self.entries.get(&Self::key(text)) {
            Some(vector) => {
                self.hits += 1;
                Some(vector.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Remember the embedding for `text`.
    pub fn put(&mut self, text: &str, embedding: Vec<f32>) {
        self.entries.put(Self::key(text), embedding);
    }

    /// `(hits, misses)` counters for the run summary.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let mut cache = EmbeddingCache::new(16);
        assert!(cache.get("chunk text").is_none());
        cache.put("chunk text", vec![1.0, 2.0]);
        assert_eq!(cache.get("chunk text").unwrap(), vec![1.0, 2.0]);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn capacity_evicts_least_recent() {
        let mut cache = EmbeddingCache::new(2);
        cache.put("a", vec![1.0]);
        cache.put("b", vec![2.0]);
        cache.put("c", vec![3.0]);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut cache = EmbeddingCache::new(0);
        cache.put("x", vec![1.0]);
        assert!(cache.get("x").is_some());
        assert_eq!(cache.len(), 1);
    }
}
