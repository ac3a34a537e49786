//! Semantic chunking for page text.
//!
//! Splits text into overlapping chunks along sentence boundaries, bounded
//! by a target size, so each chunk embeds as a coherent span while the
//! overlap preserves context across chunk borders.

mod types;

pub use types::{BoundaryRule, ChunkConfig, SentenceBoundary};


/// Split `text` into overlapping chunks.
///
/// Sentences (per `boundary`) are accumulated greedily into a buffer. When
/// appending a sentence would push a non-empty buffer past
/// `config.target_size`, the buffer is closed (trimmed and emitted) and the
/// next buffer is seeded with the last `config.overlap` bytes of the closed
/// buffer, a space, and the sentence that triggered the close.
///
/// Text at or under the target size is returned verbatim as a single
/// chunk. A single sentence longer than the target is never split further;
/// it is emitted as one oversized chunk. The overlap carry-over is a raw
/// byte slice snapped forward to a char boundary, so it may start mid-word.
pub fn chunk_text(text: &str, config: &ChunkConfig, boundary: &dyn BoundaryRule) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.len() <= config.target_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for sentence in boundary.split(text) {
        if !buffer.is_empty() && buffer.len() + sentence.len() > config.target_size {
            let carry = overlap_tail(&buffer, config.overlap).to_string();
            chunks.push(buffer.trim().to_string());

            buffer.clear();
            if !carry.is_empty() {
                buffer.push_str(&carry);
                buffer.push(' ');
            }
            buffer.push_str(sentence);
        } else {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(sentence);
        }
    }

    let tail = buffer.trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }
    chunks
}

/// Last `overlap` bytes of `buffer` (the whole buffer if shorter), snapped
/// forward to a UTF-8 char boundary so the slice never lands mid-code-point.
fn overlap_tail(buffer: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    if buffer.len() <= overlap {
        return buffer;
    }
    let mut start = buffer.len() - overlap;
    while !buffer.is_char_boundary(start) {
        start += 1;
    }
    &buffer[start..]
}
