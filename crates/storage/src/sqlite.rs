//! SQLite-backed vector store.
//!
//! Each collection lives in its own database file under the store path, so
//! a run owns exactly the state it targets. Vectors are stored as
//! little-endian f32 blobs, metadata as JSON text.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::{IndexEntry, StoreError, VectorStore};

const CREATE_CHUNKS_SQL: &str = "CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    embedding BLOB NOT NULL,
    document TEXT NOT NULL,
    metadata TEXT NOT NULL
)";

pub struct SqliteVectorStore {
    conn: Connection,
    db_path: PathBuf,
    dimensions: usize,
}

impl SqliteVectorStore {
    /// Open (creating if needed) the database for `collection` under
    /// `store_path`. Does not wipe existing data; call
    /// [`reset`](VectorStore::reset) for a fresh run.
    pub async fn open(
        store_path: impl AsRef<Path>,
        collection: &str,
        dimensions: usize,
    ) -> Result<Self, StoreError> {
        let store_path = store_path.as_ref();
        std::fs::create_dir_all(store_path)?;
        let db_path = store_path.join(format!("{}.db", sanitize_collection(collection)));
        let conn = Connection::open(&db_path).await?;
        let store = Self {
            conn,
            db_path,
            dimensions,
        };
        store.execute_batch_sql(CREATE_CHUNKS_SQL.to_string()).await?;
        Ok(store)
    }

    /// Vector dimension every entry must match.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Path of the collection's database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Fetch a single entry by id (used by tests and inspection tooling).
    pub async fn fetch(&self, id: &str) -> Result<Option<IndexEntry>, StoreError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare("SELECT id, embedding, document, metadata FROM chunks WHERE id = ?1")?;
                let entry = stmt
                    .query_row([&id], |row| {
                        let blob: Vec<u8> = row.get(1)?;
                        let metadata: String = row.get(3)?;
                        Ok(IndexEntry {
                            id: row.get(0)?,
                            vector: blob_to_vector(&blob),
                            document: row.get(2)?,
                            metadata: serde_json::from_str(&metadata).unwrap_or_default(),
                        })
                    })
                    .optional()?;
                Ok(entry)
            })
            .await
            .map_err(StoreError::from)
    }

    async fn execute_batch_sql(&self, sql: String) -> Result<(), StoreError> {
        self.conn
            .call(move |conn| {
                conn.execute_batch(&sql)?;
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn reset(&self) -> Result<(), StoreError> {
        self.execute_batch_sql(format!(
            "DROP TABLE IF EXISTS chunks;\n{CREATE_CHUNKS_SQL};\nVACUUM;"
        ))
        .await?;
        info!(path = %self.db_path.display(), "vector store reset");
        Ok(())
    }

    async fn add_batch(
        &self,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
        metadatas: &[serde_json::Value],
    ) -> Result<(), StoreError> {
        if ids.len() != vectors.len()
            || ids.len() != documents.len()
            || ids.len() != metadatas.len()
        {
            return Err(StoreError::LengthMismatch {
                ids: ids.len(),
                vectors: vectors.len(),
                documents: documents.len(),
                metadatas: metadatas.len(),
            });
        }
        for vector in vectors {
            if vector.len() != self.dimensions {
                return Err(StoreError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: vector.len(),
                });
            }
        }
        if ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<(String, Vec<u8>, String, String)> = ids
            .iter()
            .zip(vectors)
            .zip(documents)
            .zip(metadatas)
            .map(|(((id, vector), document), metadata)| {
                (
                    id.clone(),
                    vector_to_blob(vector),
                    document.clone(),
                    metadata.to_string(),
                )
            })
            .collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx
                        .prepare(
                            "INSERT INTO chunks (id, embedding, document, metadata) \
                             VALUES (?1, ?2, ?3, ?4)",
                        )?;
                    for (id, blob, document, metadata) in &rows {
                        stmt.execute((id, blob, document, metadata))?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(StoreError::from)
    }
}

/// Collection names become filenames; keep them filesystem-safe.
fn sanitize_collection(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
