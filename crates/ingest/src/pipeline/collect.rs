//! Turns one extracted document into its ordered chunk list.

use ragdex_core::{Chunk, ChunkMetadata};

use crate::document::chunker::{chunk_text, BoundaryRule, ChunkConfig};
use crate::document::table::format_table;
use crate::document::{document_stem, ExtractedDocument};

use super::ids::ChunkIdAllocator;

/// Collect all chunks of `doc`, page by page: tables first (formatted with
/// `[TABLE]` markers), then the page text split into overlapping chunks.
///
/// Table text is not subtracted from the page text, so tabular content is
/// indexed twice: once structured, once inside the prose stream. Empty
/// tables and whitespace-only chunks are dropped; positional indexes keep
/// counting the dropped entries so positions stay stable.
pub fn collect_chunks(
    doc: &ExtractedDocument,
    config: &ChunkConfig,
    boundary: &dyn BoundaryRule,
    ids: &mut ChunkIdAllocator,
) -> Vec<Chunk> {
    let stem = document_stem(&doc.filename);
    let mut chunks = Vec::new();

    for page in &doc.pages {
        for (table_index, grid) in page.tables.iter().enumerate() {
            let Some(text) = format_table(grid) else {
                continue;
            };
            chunks.push(Chunk {
                id: ids.next_id(stem),
                text,
                metadata: ChunkMetadata::table(&doc.filename, page.page_number, table_index),
            });
        }

        if page.text.trim().is_empty() {
            continue;
        }
        let page_chunks = chunk_text(&page.text, config, boundary);
        let total_chunks_on_page = page_chunks.len();
        for (chunk_index, text) in page_chunks.into_iter().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            chunks.push(Chunk {
                id: ids.next_id(stem),
                text,
                metadata: ChunkMetadata::text(
                    &doc.filename,
                    page.page_number,
                    chunk_index,
                    total_chunks_on_page,
                ),
            });
        }
    }

    chunks
}
