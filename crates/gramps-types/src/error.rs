use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid handle: {0:?}")]
    InvalidHandle(String),

    #[error("expected a mapping for {class}, got {actual}")]
    NotAMapping { class: String, actual: String },

    #[error("class mismatch: expected {expected}, got {actual}")]
    ClassMismatch { expected: String, actual: String },

    #[error("field {field} of {class}: {reason}")]
    InvalidField {
        class: String,
        field: String,
        reason: String,
    },
}
