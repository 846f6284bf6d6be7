//! Foundation types for Gramps record structs.
//!
//! Every genealogical record (Person, Family, Event, ...) can be flattened
//! into a canonical nested structure of mappings, sequences and scalars. This
//! crate defines that structure and the identifiers used to address records.
//! Every other crate in the workspace depends on `gramps-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Canonical struct: scalar, sequence, mapping, or reference
//! - [`Handle`] -- Stable identifier of a record within a store
//! - [`RefHandle`] -- Placeholder pointing at another record by (category, handle)
//! - [`Category`] -- The closed set of ten entity kinds
//! - [`Entity`] / [`Record`] -- Typed records with struct encode/decode
//! - [`Progress`] -- Progress-reporting handle for long batch operations

pub mod category;
pub mod entity;
pub mod error;
pub mod handle;
pub mod progress;
pub mod record;
pub mod value;

pub use category::Category;
pub use entity::{
    Citation, Entity, EntityData, Event, Family, Media, Note, Person, Place, Repository, Source,
    Tag,
};
pub use error::TypeError;
pub use handle::{Handle, RefHandle};
pub use progress::{NoProgress, Progress};
pub use record::Record;
pub use value::Value;
