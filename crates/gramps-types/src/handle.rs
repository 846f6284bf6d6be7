use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::TypeError;

/// Stable identifier of a record within a record store.
///
/// Handles are opaque strings. They are ordered by their string form
/// (byte-wise), which gives both sides of a store comparison the same total
/// order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Create a handle from any non-empty string.
    pub fn new(handle: impl Into<String>) -> Result<Self, TypeError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(TypeError::InvalidHandle(handle));
        }
        Ok(Self(handle))
    }

    /// The handle's string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters) for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Handle {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Handle {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// A reference from one record to another, identified by the target's
/// category and handle.
///
/// A `RefHandle` does not own its target: the target's lifetime is governed
/// by the record store alone. It must be resolved through a store before a
/// path can descend into the target's fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RefHandle {
    /// Category of the referenced record.
    pub classname: Category,
    /// Handle of the referenced record.
    pub handle: Handle,
}

impl RefHandle {
    pub fn new(classname: Category, handle: Handle) -> Self {
        Self { classname, handle }
    }
}

impl fmt::Display for RefHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.classname, self.handle)
    }
}
