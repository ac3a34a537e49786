use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(String),

    #[error(
        "parallel slices differ in length: ids={ids}, vectors={vectors}, \
         documents={documents}, metadatas={metadatas}"
    )]
    LengthMismatch {
        ids: usize,
        vectors: usize,
        documents: usize,
        metadatas: usize,
    },

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<tokio_rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<tokio_rusqlite::rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}
