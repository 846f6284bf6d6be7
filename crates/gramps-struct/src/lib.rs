//! Path-addressable access to Gramps record structs.
//!
//! Every record in a family tree has a canonical struct form: nested
//! mappings and sequences of scalars, where each object mapping carries a
//! `_class` key and links to other records are reference handles. This
//! crate reads and writes into those structs by path.
//!
//! # Architecture
//!
//! - **Paths** are `.`-separated segments. Quoted literals and call
//!   arguments suspend the delimiter, so `first_name.startswith('Sa.')` is
//!   three segments.
//! - **The facade** ([`Struct`]) walks a path across sequences, mappings,
//!   string methods and, with a store attached, across references into
//!   other records.
//! - **Commit-back**: a [`Struct::set`] on a store-backed facade rebuilds the
//!   owning record with [`reconstruct`] and writes it in one transaction.
//!
//! # Modules
//!
//! - [`path`] -- Path tokenizer
//! - [`literal`] -- Literal argument lists for method calls
//! - [`method`] -- Builtin string methods
//! - [`facade`] -- The [`Struct`] facade and lookup [`Node`]s
//! - [`reconstruct`](mod@reconstruct) -- Class-dispatch reconstruction of live records
//! - [`refs`] -- Reference collection
//! - [`error`] -- Error types

pub mod error;
pub mod facade;
pub mod literal;
pub mod method;
pub mod path;
pub mod reconstruct;
pub mod refs;

pub use error::{StructError, StructResult};
pub use facade::{Node, Struct};
pub use method::{Builtin, Method};
pub use path::parse;
pub use reconstruct::reconstruct;
pub use refs::collect_references;
