use gramps_types::Record;

use crate::error::StoreError;
use crate::traits::RecordStore;

/// A write staged in a [`Transaction`].
#[derive(Clone, Debug, PartialEq)]
pub enum TxnOp {
    /// Insert a record whose handle is not in the store yet.
    Add(Record),
    /// Replace a record whose handle is already in the store.
    Commit(Record),
}

impl TxnOp {
    pub fn record(&self) -> &Record {
        match self {
            TxnOp::Add(r) | TxnOp::Commit(r) => r,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            TxnOp::Add(r) | TxnOp::Commit(r) => r,
        }
    }
}

/// A batch of staged writes that lands in a store all at once.
///
/// Nothing reaches the store until the transaction is handed to
/// [`RecordStore::transaction_commit`]. Dropping it instead discards every
/// staged write.
#[derive(Debug)]
#[must_use = "a transaction does nothing until committed"]
pub struct Transaction {
    message: String,
    ops: Vec<TxnOp>,
}

impl Transaction {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ops: Vec::new(),
        }
    }

    /// Human-readable description of the change.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ops(&self) -> &[TxnOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn stage(&mut self, op: TxnOp) {
        self.ops.push(op);
    }

    pub fn into_ops(self) -> Vec<TxnOp> {
        self.ops
    }
}

/// Run `f` inside a transaction on `store`.
///
/// The transaction is committed when `f` returns `Ok` and aborted when it
/// returns `Err`, so the store either receives every write `f` staged or
/// none of them.
pub fn with_transaction<S, T, E, F>(store: &S, message: &str, f: F) -> Result<T, E>
where
    S: RecordStore + ?Sized,
    E: From<StoreError>,
    F: FnOnce(&mut Transaction) -> Result<T, E>,
{
    let mut txn = store.begin(message);
    match f(&mut txn) {
        Ok(value) => {
            store.transaction_commit(txn)?;
            Ok(value)
        }
        Err(err) => {
            store.transaction_abort(txn);
            Err(err)
        }
    }
}
