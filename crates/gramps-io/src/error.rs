//! Error types for import and export.

use gramps_store::StoreError;
use gramps_struct::StructError;

/// Errors that can occur while moving records between files and stores.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A record struct in the file could not be rebuilt.
    #[error("struct error: {0}")]
    Struct(#[from] StructError),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for import and export results.
pub type ImportResult<T> = Result<T, ImportError>;
