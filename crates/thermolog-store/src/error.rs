//! Error types for thermolog-store.

use std::path::PathBuf;

/// Result type for thermolog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in thermolog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to create the dataset file.
    #[error("failed to create dataset {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to append a record to the dataset.
    #[error("failed to append to dataset: {0}")]
    Append(#[source] std::io::Error),

    /// Failed to flush buffered records to stable storage.
    #[error("failed to flush dataset to stable storage: {0}")]
    Flush(#[source] std::io::Error),

    /// The writer was used after being closed. Closing twice or appending
    /// after close is a programming error, not a runtime condition.
    #[error("dataset is already closed")]
    AlreadyClosed,

    /// A timestamp could not be formatted.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}
