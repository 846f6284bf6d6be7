use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use gramps_types::{Category, Handle, Record};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;
use crate::transaction::{Transaction, TxnOp};

type Tables = HashMap<Category, BTreeMap<Handle, Record>>;

/// In-memory record store.
///
/// Intended for tests, imports and embedding. Records are held per category
/// in handle order behind a `RwLock`, and are cloned on read/write.
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store holding the given records.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record outside of any transaction.
    ///
    /// Returns the record previously stored under the same handle.
    pub fn insert(&self, record: Record) -> Option<Record> {
        let mut tables = self.tables.write().expect("lock poisoned");
        tables
            .entry(record.category())
            .or_default()
            .insert(record.handle().clone(), record)
    }

    /// Remove a record outside of any transaction.
    pub fn remove(&self, category: Category, handle: &Handle) -> Option<Record> {
        let mut tables = self.tables.write().expect("lock poisoned");
        tables.get_mut(&category)?.remove(handle)
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .expect("lock poisoned")
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records in one category.
    pub fn count(&self, category: Category) -> usize {
        self.tables
            .read()
            .expect("lock poisoned")
            .get(&category)
            .map_or(0, BTreeMap::len)
    }

    /// All records of a category, in handle order.
    pub fn records(&self, category: Category) -> Vec<Record> {
        self.tables
            .read()
            .expect("lock poisoned")
            .get(&category)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove all records from the store.
    pub fn clear(&self) {
        self.tables.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn handles(&self, category: Category) -> StoreResult<Vec<Handle>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables
            .get(&category)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, category: Category, handle: &Handle) -> StoreResult<Option<Record>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables.get(&category).and_then(|t| t.get(handle)).cloned())
    }

    fn transaction_commit(&self, txn: Transaction) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("lock poisoned");

        // Validate every staged op before touching any table, so a rejected
        // transaction leaves the store exactly as it was.
        let mut staged: HashSet<(Category, &Handle)> = HashSet::new();
        for op in txn.ops() {
            let record = op.record();
            let key = (record.category(), record.handle());
            let exists = staged.contains(&key)
                || tables
                    .get(&key.0)
                    .is_some_and(|table| table.contains_key(key.1));
            match op {
                TxnOp::Add(_) if exists => {
                    return Err(StoreError::AlreadyExists {
                        category: key.0,
                        handle: key.1.clone(),
                    })
                }
                TxnOp::Commit(_) if !exists => {
                    return Err(StoreError::NotFound {
                        category: key.0,
                        handle: key.1.clone(),
                    })
                }
                _ => {}
            }
            staged.insert(key);
        }
        drop(staged);

        let message = txn.message().to_string();
        let count = txn.len();
        for op in txn.into_ops() {
            let record = op.into_record();
            tables
                .entry(record.category())
                .or_default()
                .insert(record.handle().clone(), record);
        }
        debug!(message = %message, ops = count, "transaction committed");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::with_transaction;
    use gramps_types::{Entity, Family, Note, Person};

    fn h(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    fn person(handle: &str, id: &str) -> Record {
        Person::new(h(handle)).with_gramps_id(id).into()
    }

    // -----------------------------------------------------------------------
    // Fixture loading
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_get() {
        let store = InMemoryRecordStore::new();
        assert!(store.insert(person("P1", "I001")).is_none());

        let record = store.get(Category::Person, &h("P1")).unwrap().expect("should exist");
        assert_eq!(record.gramps_id(), Some("I001"));
        assert!(store.get(Category::Family, &h("P1")).unwrap().is_none());
    }

    #[test]
    fn insert_replaces_existing() {
        let store = InMemoryRecordStore::new();
        store.insert(person("P1", "I001"));
        let previous = store.insert(person("P1", "I002")).expect("replaced");
        assert_eq!(previous.gramps_id(), Some("I001"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn handles_for_empty_category_is_empty() {
        let store = InMemoryRecordStore::new();
        for category in Category::ALL {
            assert!(store.handles(category).unwrap().is_empty());
        }
    }

    #[test]
    fn sorted_handles_are_ascending() {
        let store = InMemoryRecordStore::from_records([
            person("c", "I3"),
            person("a", "I1"),
            person("b", "I2"),
        ]);
        let handles = store.sorted_handles(Category::Person).unwrap();
        assert_eq!(handles, vec![h("a"), h("b"), h("c")]);
    }

    #[test]
    fn fetch_struct_flattens_record() {
        let store = InMemoryRecordStore::from_records([person("P1", "I001")]);
        let s = store.fetch_struct(Category::Person, &h("P1")).unwrap().unwrap();
        assert_eq!(s.class_name(), Some("Person"));
        assert_eq!(s.get("gramps_id").and_then(|v| v.as_str()), Some("I001"));
    }

    #[test]
    fn remove_and_counts() {
        let store = InMemoryRecordStore::from_records([
            person("P1", "I001"),
            Note::new(h("N1")).into(),
        ]);
        assert_eq!(store.count(Category::Person), 1);
        assert_eq!(store.count(Category::Note), 1);
        assert!(store.remove(Category::Person, &h("P1")).is_some());
        assert!(store.remove(Category::Person, &h("P1")).is_none());
        assert_eq!(store.len(), 1);
        store.clear();
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_commit_in_separate_transactions() {
        let store = InMemoryRecordStore::new();
        let mut txn = store.begin("add person");
        store.add(&mut txn, person("P1", "I001")).unwrap();
        assert!(store.is_empty(), "nothing lands before commit");
        store.transaction_commit(txn).unwrap();
        assert_eq!(store.len(), 1);

        let mut txn = store.begin("edit person");
        store.commit(&mut txn, person("P1", "I002")).unwrap();
        store.transaction_commit(txn).unwrap();
        let record = store.get(Category::Person, &h("P1")).unwrap().unwrap();
        assert_eq!(record.gramps_id(), Some("I002"));
    }

    #[test]
    fn add_of_existing_record_is_rejected() {
        let store = InMemoryRecordStore::from_records([person("P1", "I001")]);
        let mut txn = store.begin("dup");
        store.add(&mut txn, person("P1", "I999")).unwrap();
        let err = store.transaction_commit(txn).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { category: Category::Person, .. }));
    }

    #[test]
    fn commit_of_missing_record_is_rejected() {
        let store = InMemoryRecordStore::new();
        let mut txn = store.begin("ghost");
        store.commit(&mut txn, person("P1", "I001")).unwrap();
        let err = store.transaction_commit(txn).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn rejected_transaction_applies_nothing() {
        let store = InMemoryRecordStore::new();
        let mut txn = store.begin("mixed");
        store.add(&mut txn, Family::new(h("F1")).into()).unwrap();
        store.commit(&mut txn, person("P404", "I404")).unwrap();
        assert!(store.transaction_commit(txn).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn add_then_commit_within_one_transaction() {
        let store = InMemoryRecordStore::new();
        let mut txn = store.begin("create and edit");
        store.add(&mut txn, person("P1", "I001")).unwrap();
        store.commit(&mut txn, person("P1", "I002")).unwrap();
        store.transaction_commit(txn).unwrap();
        let record = store.get(Category::Person, &h("P1")).unwrap().unwrap();
        assert_eq!(record.gramps_id(), Some("I002"));
    }

    #[test]
    fn with_transaction_commits_on_ok() {
        let store = InMemoryRecordStore::new();
        let out: StoreResult<&str> = with_transaction(&store, "ok", |txn| {
            store.add(txn, person("P1", "I001"))?;
            Ok("done")
        });
        assert_eq!(out.unwrap(), "done");
        assert!(store.contains(Category::Person, &h("P1")).unwrap());
    }

    #[test]
    fn with_transaction_rolls_back_on_err() {
        let store = InMemoryRecordStore::new();
        let out: StoreResult<()> = with_transaction(&store, "fails", |txn| {
            store.add(txn, person("P1", "I001"))?;
            Err(StoreError::NotFound {
                category: Category::Note,
                handle: h("N1"),
            })
        });
        assert!(out.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn records_are_cloned_on_read() {
        let store = InMemoryRecordStore::from_records([person("P1", "I001")]);
        let Record::Person(mut p) = store.get(Category::Person, &h("P1")).unwrap().unwrap() else {
            panic!("expected a person");
        };
        p.data_mut().gramps_id = Some("changed".into());
        let again = store.get(Category::Person, &h("P1")).unwrap().unwrap();
        assert_eq!(again.gramps_id(), Some("I001"));
    }

    #[test]
    fn debug_format() {
        let store = InMemoryRecordStore::from_records([person("P1", "I001")]);
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryRecordStore"));
        assert!(debug.contains("record_count"));
    }
}
