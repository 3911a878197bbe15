use qbot_core::QbotError;
use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    /// Malformed request, e.g. an add command without `<quote> - <author>`.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Platform(#[from] QbotError),
}

impl QuoteError {
    /// Folds store-level validation into [`QuoteError::Validation`] so callers see one kind.
    pub(crate) fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::Validation(message) => QuoteError::Validation(message),
            other => QuoteError::Storage(other),
        }
    }
}
