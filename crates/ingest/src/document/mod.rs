pub mod chunker;
pub mod pdf;
pub mod table;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A 2-D grid of table cells; empty cells are empty strings.
pub type TableGrid = Vec<Vec<String>>;

/// A page of extracted content.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// Full page text. Table text is included here as well; tables are
    /// not subtracted from the text stream.
    pub text: String,
    /// Tables detected on this page, in reading order.
    pub tables: Vec<TableGrid>,
}

/// Result of extracting structured content from one document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// Extracted pages with text and tables.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Seam over the concrete document parser so the pipeline can run against
/// in-memory fixtures in tests.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<ExtractedDocument, ExtractionError>;
}

/// Filename without its final extension, used as the chunk id prefix.
pub fn document_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}
