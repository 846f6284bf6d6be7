//! Error types for struct access.

use gramps_store::StoreError;

/// Errors from struct reconstruction and mutation.
#[derive(Debug, thiserror::Error)]
pub enum StructError {
    /// The struct cannot be turned back into a record: not a mapping,
    /// missing or unknown `_class`, or malformed fields.
    #[error("invalid struct: {reason}")]
    InvalidStruct { reason: String },

    /// A set addressed a mapping key that does not exist.
    #[error("no such property: {0}")]
    NoSuchProperty(String),

    /// A call-arguments segment is not a literal argument list.
    #[error("invalid arguments {segment}: {reason}")]
    InvalidArguments { segment: String, reason: String },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl StructError {
    pub(crate) fn invalid_struct(reason: impl Into<String>) -> Self {
        StructError::InvalidStruct {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for struct results.
pub type StructResult<T> = Result<T, StructError>;
