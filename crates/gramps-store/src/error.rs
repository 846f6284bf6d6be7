use gramps_types::{Category, Handle};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A commit targeted a record that does not exist.
    #[error("{category} record not found: {handle}")]
    NotFound { category: Category, handle: Handle },

    /// An add targeted a record that already exists.
    #[error("{category} record already exists: {handle}")]
    AlreadyExists { category: Category, handle: Handle },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
