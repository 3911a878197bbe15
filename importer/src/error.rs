use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The source cannot be read or has an incompatible shape.
    #[error("Source error: {0}")]
    Source(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,
}

impl From<sqlx::Error> for ImportError {
    fn from(err: sqlx::Error) -> Self {
        ImportError::Source(err.to_string())
    }
}
