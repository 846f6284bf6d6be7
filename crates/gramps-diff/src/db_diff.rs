//! Database-pair diff: merge-join two record stores category by category.
//!
//! For every category, both stores' handles are sorted and walked with two
//! cursors. Each handle of either store ends up in exactly one bucket:
//! changed, unchanged, missing from the new store, or missing from the old.

use std::cmp::Ordering;

use gramps_store::RecordStore;
use gramps_types::{Category, Handle, Progress, Record};
use tracing::{debug, info};

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::structs::StructDiffer;

/// A record present in both stores whose structs differ.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangedRecord {
    pub category: Category,
    pub old: Record,
    pub new: Record,
}

/// A record present in only one of the two stores.
#[derive(Clone, Debug, PartialEq)]
pub struct MissingRecord {
    pub category: Category,
    pub record: Record,
}

/// The result of comparing two record stores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DbDiff {
    /// Records in both stores that differ, in category then handle order.
    pub diffs: Vec<ChangedRecord>,
    /// Records only in the old store.
    pub missing_from_new: Vec<MissingRecord>,
    /// Records only in the new store.
    pub missing_from_old: Vec<MissingRecord>,
    /// Number of records in both stores that do not differ.
    pub unchanged: usize,
}

impl DbDiff {
    /// Returns `true` if the stores hold the same records.
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty() && self.missing_from_new.is_empty() && self.missing_from_old.is_empty()
    }

    /// Number of changed, removed and added records together.
    pub fn len(&self) -> usize {
        self.diffs.len() + self.missing_from_new.len() + self.missing_from_old.len()
    }
}

/// Compare two stores with the default configuration.
pub fn diff_dbs(
    old: &dyn RecordStore,
    new: &dyn RecordStore,
    progress: &mut dyn Progress,
) -> DiffResult<DbDiff> {
    diff_dbs_with(&DiffConfig::default(), old, new, progress)
}

/// Compare two stores, walking `config.categories` in order.
///
/// Neither store is modified.
pub fn diff_dbs_with(
    config: &DiffConfig,
    old: &dyn RecordStore,
    new: &dyn RecordStore,
    progress: &mut dyn Progress,
) -> DiffResult<DbDiff> {
    let differ = StructDiffer::new(config);
    let mut result = DbDiff::default();

    for &category in &config.categories {
        let old_handles = old.sorted_handles(category)?;
        let new_handles = new.sorted_handles(category)?;
        progress.begin(
            &format!("Comparing {category} records"),
            old_handles.len().max(new_handles.len()),
        );

        let before = (result.diffs.len(), result.missing_from_new.len(), result.missing_from_old.len());
        let mut olds = old_handles.into_iter().peekable();
        let mut news = new_handles.into_iter().peekable();
        loop {
            let ordering = match (olds.peek(), news.peek()) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            match ordering {
                Ordering::Equal => {
                    if let (Some(handle), Some(_)) = (olds.next(), news.next()) {
                        let a = fetch(old, category, &handle)?;
                        let b = fetch(new, category, &handle)?;
                        if differ.differ(category.as_str(), &a.to_struct(), &b.to_struct()) {
                            debug!(%category, handle = %handle, "record differs");
                            result.diffs.push(ChangedRecord { category, old: a, new: b });
                        } else {
                            result.unchanged += 1;
                        }
                    }
                }
                Ordering::Less => {
                    if let Some(handle) = olds.next() {
                        let record = fetch(old, category, &handle)?;
                        result.missing_from_new.push(MissingRecord { category, record });
                    }
                }
                Ordering::Greater => {
                    if let Some(handle) = news.next() {
                        let record = fetch(new, category, &handle)?;
                        result.missing_from_old.push(MissingRecord { category, record });
                    }
                }
            }
            progress.step();
        }
        progress.end();

        info!(
            %category,
            changed = result.diffs.len() - before.0,
            removed = result.missing_from_new.len() - before.1,
            added = result.missing_from_old.len() - before.2,
            "category compared"
        );
    }

    Ok(result)
}

fn fetch(store: &dyn RecordStore, category: Category, handle: &Handle) -> DiffResult<Record> {
    store
        .get(category, handle)?
        .ok_or_else(|| DiffError::RecordVanished {
            category,
            handle: handle.clone(),
        })
}
