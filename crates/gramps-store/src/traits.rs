use gramps_types::{Category, Handle, Record, Value};
use tracing::debug;

use crate::error::StoreResult;
use crate::transaction::{Transaction, TxnOp};

/// A store of genealogical records, one table per category.
///
/// All implementations must satisfy these invariants:
/// - Every category in [`Category::ALL`] is enumerable, even when empty.
/// - Writes go through a [`Transaction`]; `add`/`commit` only stage them and
///   [`transaction_commit`](RecordStore::transaction_commit) applies all
///   staged operations or none.
/// - All I/O errors are propagated, never silently ignored.
pub trait RecordStore: Send + Sync {
    /// All handles currently in the category, in no particular order.
    fn handles(&self, category: Category) -> StoreResult<Vec<Handle>>;

    /// Fetch a live record.
    ///
    /// Returns `Ok(None)` if the record does not exist.
    fn get(&self, category: Category, handle: &Handle) -> StoreResult<Option<Record>>;

    /// Apply every operation staged in `txn`, atomically.
    fn transaction_commit(&self, txn: Transaction) -> StoreResult<()>;

    /// Discard a transaction without applying it.
    fn transaction_abort(&self, txn: Transaction) {
        debug!(message = txn.message(), staged = txn.len(), "transaction aborted");
    }

    /// Open a transaction against this store.
    fn begin(&self, message: &str) -> Transaction {
        Transaction::new(message)
    }

    /// Stage the addition of a new record.
    fn add(&self, txn: &mut Transaction, record: Record) -> StoreResult<()> {
        txn.stage(TxnOp::Add(record));
        Ok(())
    }

    /// Stage the replacement of an existing record.
    fn commit(&self, txn: &mut Transaction, record: Record) -> StoreResult<()> {
        txn.stage(TxnOp::Commit(record));
        Ok(())
    }

    /// Check whether a record exists.
    fn contains(&self, category: Category, handle: &Handle) -> StoreResult<bool> {
        Ok(self.get(category, handle)?.is_some())
    }

    /// Fetch a record and flatten it into its canonical struct.
    fn fetch_struct(&self, category: Category, handle: &Handle) -> StoreResult<Option<Value>> {
        Ok(self.get(category, handle)?.map(|record| record.to_struct()))
    }

    /// All handles of the category, sorted ascending by string form.
    fn sorted_handles(&self, category: Category) -> StoreResult<Vec<Handle>> {
        let mut handles = self.handles(category)?;
        handles.sort();
        Ok(handles)
    }
}
