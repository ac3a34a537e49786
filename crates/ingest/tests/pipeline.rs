//! End-to-end pipeline tests against in-memory parser, embedder, and store
//! fakes; only the directory scan touches the filesystem.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use ragdex_core::{EmbeddingConfig, IndexConfig};
use ragdex_ingest::document::{DocumentParser, ExtractedDocument, ExtractionError, PageContent};
use ragdex_ingest::embedding::{Embedder, EmbeddingError};
use ragdex_ingest::{Indexer, PipelineError};
use ragdex_storage::{StoreError, VectorStore};

const DIMS: usize = 8;

// ── Fakes ───────────────────────────────────────────────────────────

/// Serves canned pages by filename; unknown files fail like corrupt PDFs.
struct FakeParser {
    docs: HashMap<String, Vec<PageContent>>,
}

impl FakeParser {
    fn new() -> Self {
        Self {
            docs: HashMap::new(),
        }
    }

    fn with_doc(mut self, filename: &str, pages: Vec<PageContent>) -> Self {
        self.docs.insert(filename.to_string(), pages);
        self
    }
}

impl DocumentParser for FakeParser {
    fn parse(&self, path: &Path) -> Result<ExtractedDocument, ExtractionError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        match self.docs.get(&filename) {
            Some(pages) => Ok(ExtractedDocument {
                filename,
                pages: pages.clone(),
            }),
            None => Err(ExtractionError::Pdf("unreadable document".to_string())),
        }
    }
}

/// Deterministic vectors; selected calls can be made to fail.
struct FakeEmbedder {
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
    fail_calls: Vec<usize>,
}

impl FakeEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
            fail_calls: Vec::new(),
        }
    }

    fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.to_vec(),
            ..Self::new()
        }
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());
        if self.fail_calls.contains(&call) {
            return Err(EmbeddingError::Api("simulated outage".to_string()));
        }
        Ok(texts
            .iter()
            .map(|t| vec![t.len() as f32; DIMS])
            .collect())
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

type StoredEntry = (String, Vec<f32>, String, serde_json::Value);

/// In-memory store recording every batch; selected writes can fail.
#[derive(Default)]
struct FakeStore {
    entries: Mutex<Vec<StoredEntry>>,
    batch_sizes: Mutex<Vec<usize>>,
    resets: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: Vec<usize>,
}

impl FakeStore {
    fn failing_on(writes: &[usize]) -> Self {
        Self {
            fail_writes: writes.to_vec(),
            ..Self::default()
        }
    }

    fn ids(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(id, ..)| id.clone())
            .collect()
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn reset(&self) -> Result<(), StoreError> {
        self.entries.lock().unwrap().clear();
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_batch(
        &self,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
        metadatas: &[serde_json::Value],
    ) -> Result<(), StoreError> {
        assert_eq!(ids.len(), vectors.len());
        assert_eq!(ids.len(), documents.len());
        assert_eq!(ids.len(), metadatas.len());

        let write = self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.contains(&write) {
            return Err(StoreError::Database("simulated write failure".to_string()));
        }

        self.batch_sizes.lock().unwrap().push(ids.len());
        let mut entries = self.entries.lock().unwrap();
        for i in 0..ids.len() {
            entries.push((
                ids[i].clone(),
                vectors[i].clone(),
                documents[i].clone(),
                metadatas[i].clone(),
            ));
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.lock().unwrap().len())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn text_page(page_number: usize, text: &str) -> PageContent {
    PageContent {
        page_number,
        text: text.to_string(),
        tables: Vec::new(),
    }
}

fn pdf_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
    }
    dir
}

fn config(dir: &Path, chunk_size: usize, chunk_overlap: usize, batch_size: usize) -> IndexConfig {
    IndexConfig {
        pdf_dir: dir.to_path_buf(),
        store_path: dir.join("store"),
        collection: "test_collection".to_string(),
        chunk_size,
        chunk_overlap,
        batch_size,
        embedding: EmbeddingConfig {
            provider: "ollama".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "all-minilm".to_string(),
            openai_api_key: None,
            openai_model: "text-embedding-3-small".to_string(),
            openai_base_url: None,
            dimensions: DIMS,
            timeout_secs: 5,
            cache_capacity: 64,
        },
    }
}

fn indexer(
    cfg: IndexConfig,
    parser: FakeParser,
    embedder: Arc<FakeEmbedder>,
    store: Arc<FakeStore>,
) -> Indexer {
    Indexer::new(cfg, Arc::new(parser), embedder, store)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn corrupt_document_is_skipped_and_counted() {
    let dir = pdf_dir(&["corrupt.pdf", "good.pdf"]);
    let parser =
        FakeParser::new().with_doc("good.pdf", vec![text_page(1, "Alpha beta. Gamma delta.")]);
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 100),
        parser,
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    let summary = idx.run().await.unwrap();

    assert_eq!(summary.documents_found, 2);
    assert_eq!(summary.documents_failed, 1);
    assert_eq!(summary.documents_indexed, 1);
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(store.ids(), vec!["good_chunk_0"]);
}

#[tokio::test]
async fn empty_directory_reports_no_documents() {
    let dir = pdf_dir(&[]);
    std::fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 100),
        FakeParser::new(),
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    let err = idx.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::NoDocuments(_)));
    // The reset precedes the scan, so the store is left freshly emptied.
    assert_eq!(store.resets.load(Ordering::SeqCst), 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn rerun_over_unchanged_input_matches_counts_and_ids() {
    let dir = pdf_dir(&["a.pdf", "b.pdf"]);
    let pages = |prefix: &str| {
        vec![
            text_page(1, &format!("{prefix} page one. More text here.")),
            text_page(2, &format!("{prefix} page two. Even more text.")),
        ]
    };
    let store = Arc::new(FakeStore::default());

    let mut first_ids = Vec::new();
    for run in 0..2 {
        let parser = FakeParser::new()
            .with_doc("a.pdf", pages("Alpha"))
            .with_doc("b.pdf", pages("Bravo"));
        let mut idx = indexer(
            config(dir.path(), 800, 200, 100),
            parser,
            Arc::new(FakeEmbedder::new()),
            store.clone(),
        );
        let summary = idx.run().await.unwrap();

        assert_eq!(summary.chunks_written, 4);
        assert_eq!(store.count().await.unwrap(), 4);
        if run == 0 {
            first_ids = store.ids();
        } else {
            assert_eq!(store.ids(), first_ids);
        }
    }
    assert_eq!(store.resets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn chunks_batch_in_fixed_windows() {
    let dir = pdf_dir(&["big.pdf"]);
    let pages: Vec<PageContent> = (0..250)
        .map(|i| text_page(i + 1, &format!("Unique page {i} body text.")))
        .collect();
    let parser = FakeParser::new().with_doc("big.pdf", pages);
    let embedder = Arc::new(FakeEmbedder::new());
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 100),
        parser,
        embedder.clone(),
        store.clone(),
    );
    let summary = idx.run().await.unwrap();

    assert_eq!(summary.chunks_produced, 250);
    assert_eq!(summary.chunks_written, 250);
    assert_eq!(summary.batches_failed, 0);
    assert_eq!(*embedder.batch_sizes.lock().unwrap(), vec![100, 100, 50]);
    assert_eq!(*store.batch_sizes.lock().unwrap(), vec![100, 100, 50]);
}

#[tokio::test]
async fn three_sentence_scenario_end_to_end() {
    let dir = pdf_dir(&["doc.pdf"]);
    let parser = FakeParser::new().with_doc(
        "doc.pdf",
        vec![text_page(1, "Sentence one. Sentence two. Sentence three.")],
    );
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 20, 5, 100),
        parser,
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    let summary = idx.run().await.unwrap();

    let entries = store.entries.lock().unwrap().clone();
    assert!(entries.len() >= 2, "expected a split, got {}", entries.len());
    assert_eq!(summary.chunks_written, entries.len());

    for (i, (id, vector, text, metadata)) in entries.iter().enumerate() {
        assert_eq!(id, &format!("doc_chunk_{i}"));
        assert_eq!(vector.len(), DIMS);
        assert!(text.len() <= 25, "chunk too long: {text:?}");
        assert_eq!(metadata["source"], "doc.pdf");
        assert_eq!(metadata["page"], 1);
        assert_eq!(metadata["type"], "text");
        assert_eq!(metadata["chunk_index"], i);
        assert_eq!(metadata["total_chunks_on_page"], entries.len());
    }

    assert_eq!(entries[0].2, "Sentence one.");
    // Chunk 2 opens with the overlap carried from chunk 1.
    assert!(entries[1].2.starts_with("one. "), "got {:?}", entries[1].2);
}

#[tokio::test]
async fn failed_embedding_batch_drops_only_its_chunks() {
    let dir = pdf_dir(&["doc.pdf"]);
    let pages: Vec<PageContent> = (0..5)
        .map(|i| text_page(i + 1, &format!("Body of page number {i}.")))
        .collect();
    let parser = FakeParser::new().with_doc("doc.pdf", pages);
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 2),
        parser,
        Arc::new(FakeEmbedder::failing_on(&[1])),
        store.clone(),
    );
    let summary = idx.run().await.unwrap();

    assert_eq!(summary.batches_failed, 1);
    assert_eq!(summary.chunks_produced, 5);
    assert_eq!(summary.chunks_written, 3);
    // The dropped window leaves a gap in the stored ids.
    assert_eq!(
        store.ids(),
        vec!["doc_chunk_0", "doc_chunk_1", "doc_chunk_4"]
    );
}

#[tokio::test]
async fn failed_store_write_drops_only_its_batch() {
    let dir = pdf_dir(&["doc.pdf"]);
    let pages: Vec<PageContent> = (0..4)
        .map(|i| text_page(i + 1, &format!("Body of page number {i}.")))
        .collect();
    let parser = FakeParser::new().with_doc("doc.pdf", pages);
    let store = Arc::new(FakeStore::failing_on(&[0]));

    let mut idx = indexer(
        config(dir.path(), 800, 200, 2),
        parser,
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    let summary = idx.run().await.unwrap();

    assert_eq!(summary.batches_failed, 1);
    assert_eq!(summary.chunks_written, 2);
    assert_eq!(store.ids(), vec!["doc_chunk_2", "doc_chunk_3"]);
}

#[tokio::test]
async fn cancellation_stops_before_the_first_document() {
    let dir = pdf_dir(&["doc.pdf"]);
    let parser = FakeParser::new().with_doc("doc.pdf", vec![text_page(1, "Some text here.")]);
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 100),
        parser,
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    idx.cancel_flag().store(true, Ordering::Relaxed);
    let summary = idx.run().await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.chunks_written, 0);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn table_chunks_carry_markers_and_metadata() {
    let dir = pdf_dir(&["doc.pdf"]);
    let page = PageContent {
        page_number: 3,
        text: "Revenue 120 and costs 80.".to_string(),
        tables: vec![vec![
            vec!["Revenue".to_string(), "120".to_string()],
            vec!["Costs".to_string(), "80".to_string()],
        ]],
    };
    let parser = FakeParser::new().with_doc("doc.pdf", vec![page]);
    let store = Arc::new(FakeStore::default());

    let mut idx = indexer(
        config(dir.path(), 800, 200, 100),
        parser,
        Arc::new(FakeEmbedder::new()),
        store.clone(),
    );
    idx.run().await.unwrap();

    let entries = store.entries.lock().unwrap().clone();
    assert_eq!(entries.len(), 2);

    let (_, _, table_text, table_meta) = &entries[0];
    assert_eq!(table_text, "[TABLE]\nRevenue | 120\nCosts | 80\n[/TABLE]");
    assert_eq!(table_meta["type"], "table");
    assert_eq!(table_meta["table_index"], 0);
    assert_eq!(table_meta["page"], 3);

    let (_, _, prose_text, prose_meta) = &entries[1];
    assert!(prose_text.contains("Revenue 120"));
    assert_eq!(prose_meta["type"], "text");
}
