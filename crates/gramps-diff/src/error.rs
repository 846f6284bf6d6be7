//! Error types for the diff crate.

use gramps_types::{Category, Handle};

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A handle was enumerated but its record could not be fetched.
    #[error("record vanished during diff: {category} {handle}")]
    RecordVanished { category: Category, handle: Handle },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] gramps_store::StoreError),

    /// Loading the comparison file failed.
    #[error("import error: {0}")]
    Import(#[from] gramps_io::ImportError),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
