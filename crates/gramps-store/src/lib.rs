//! Record store contract for Gramps structs.
//!
//! A record store holds the live records of a family tree, one table per
//! [`Category`](gramps_types::Category), keyed by [`Handle`](gramps_types::Handle).
//! The struct engine only ever reads from stores, except through a
//! [`Transaction`]: writes are staged into a transaction and applied all at
//! once, or not at all.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`InMemoryRecordStore`] -- `BTreeMap`-based store for tests, imports and embedding
//!
//! # Design Rules
//!
//! 1. A store is never observed half-written: staged operations are applied
//!    atomically by [`RecordStore::transaction_commit`].
//! 2. Dropping a [`Transaction`] without committing it discards every staged
//!    operation.
//! 3. `add` targets a handle that does not exist yet; `commit` targets one
//!    that does.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;
pub mod transaction;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
pub use transaction::{with_transaction, Transaction, TxnOp};
