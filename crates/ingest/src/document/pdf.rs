//! PDF extraction with best-effort table detection.
//!
//! Text comes from `pdf-extract`; page boundaries are the form-feed
//! characters it emits between pages. Table detection is a whitespace-grid
//! heuristic over the page text and never fails the page.

use std::path::Path;

use tracing::debug;

use super::{DocumentParser, ExtractedDocument, ExtractionError, PageContent, TableGrid};

/// Minimum consecutive grid-shaped lines before a block counts as a table.
const MIN_TABLE_ROWS: usize = 2;

/// Parser for PDF files.
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<ExtractedDocument, ExtractionError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !ext.eq_ignore_ascii_case("pdf") {
            return Err(ExtractionError::UnsupportedType(ext.to_string()));
        }

        let bytes = std::fs::read(path)?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = split_pages(&text);
        debug!(file = %filename, pages = pages.len(), "extracted PDF");
        Ok(ExtractedDocument { filename, pages })
    }
}

/// Split raw extracted text into pages on form feeds. Blank pages are
/// dropped but their positions still count, so page numbers stay aligned
/// with the source document.
fn split_pages(text: &str) -> Vec<PageContent> {
    if !text.contains('\x0C') {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![make_page(1, trimmed)];
    }

    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| make_page(i + 1, page_text.trim()))
        .collect()
}

fn make_page(page_number: usize, text: &str) -> PageContent {
    PageContent {
        page_number,
        text: text.to_string(),
        tables: find_tables(text),
    }
}

/// Detect table-shaped blocks in page text: runs of `MIN_TABLE_ROWS` or
/// more consecutive lines whose cells are separated by tabs or by two or
/// more spaces. Table text stays in the page text as well; the duplicate
/// indexing of tabular content is deliberate.
pub(crate) fn find_tables(page_text: &str) -> Vec<TableGrid> {
    let mut tables = Vec::new();
    let mut current: TableGrid = Vec::new();

    for line in page_text.lines() {
        match split_row(line) {
            Some(cells) => current.push(cells),
            None => flush_table(&mut current, &mut tables),
        }
    }
    flush_table(&mut current, &mut tables);
    tables
}

fn flush_table(current: &mut TableGrid, tables: &mut Vec<TableGrid>) {
    if current.len() >= MIN_TABLE_ROWS {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Split a line into cells if it looks like a table row (two or more
/// columns). Returns None for prose lines.
fn split_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return None;
    }

    let cells: Vec<String> = if line.contains('\t') {
        // Tab-separated rows keep empty cells.
        line.split('\t').map(|cell| cell.trim().to_string()).collect()
    } else {
        split_on_wide_gaps(line)
    };

    if cells.len() >= 2 {
        Some(cells)
    } else {
        None
    }
}

/// Split on runs of two or more spaces; single spaces stay inside a cell.
fn split_on_wide_gaps(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut space_run = 0usize;

    for ch in line.chars() {
        if ch == ' ' {
            space_run += 1;
            continue;
        }
        if !current.is_empty() {
            if space_run >= 2 {
                cells.push(std::mem::take(&mut current));
            } else if space_run == 1 {
                current.push(' ');
            }
        }
        space_run = 0;
        current.push(ch);
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
