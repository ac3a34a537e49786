//! Chunker configuration and the boundary-detection seam.

/// Configuration for the chunking pass.
///
/// Lengths are byte counts. `overlap < target_size` is validated once at
/// startup by the configuration layer, not per call.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Target chunk size in bytes.
    pub target_size: usize,
    /// Bytes carried over from the end of one chunk into the next.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            target_size: 800,
            overlap: 200,
        }
    }
}

/// Strategy seam for sentence-boundary detection, so a more sophisticated
/// tokenizer can replace the default heuristic without touching the
/// chunk-accumulation algorithm.
pub trait BoundaryRule: Send + Sync {
    /// Split `text` into sentence units, in order, with boundary whitespace
    /// consumed. Units keep their terminal punctuation.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Default boundary rule: a sentence ends at `.`, `!` or `?` immediately
/// followed by whitespace. A heuristic, not a tokenizer; abbreviations,
/// decimal numbers mid-sentence, and quoted punctuation are not
/// special-cased. Decimals like `3.14` survive because the digit after the
/// dot is not whitespace.
pub struct SentenceBoundary;

impl BoundaryRule for SentenceBoundary {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let bytes = text.as_bytes();
        let mut units = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let terminal = matches!(bytes[i], b'.' | b'!' | b'?');
            if terminal && i + 1 < bytes.len() && bytes[i + 1].is_ascii_whitespace() {
                units.push(&text[start..=i]);
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                start = i;
            } else {
                i += 1;
            }
        }

        if start < text.len() {
            units.push(&text[start..]);
        }
        units
    }
}
