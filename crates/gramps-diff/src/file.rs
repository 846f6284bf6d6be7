//! Diff a record store against a family tree file.

use std::path::Path;

use gramps_io::ImporterRegistry;
use gramps_store::{InMemoryRecordStore, RecordStore};
use gramps_types::Progress;
use tracing::info;

use crate::config::DiffConfig;
use crate::db_diff::{diff_dbs_with, DbDiff};
use crate::error::DiffResult;

/// Import `path` into a fresh in-memory store and diff `old` against it.
///
/// Returns `Ok(None)` when no importer handles the file's extension.
pub fn diff_db_to_file(
    old: &dyn RecordStore,
    path: &Path,
    progress: &mut dyn Progress,
) -> DiffResult<Option<DbDiff>> {
    diff_db_to_file_with(&DiffConfig::default(), &ImporterRegistry::default(), old, path, progress)
}

/// [`diff_db_to_file`] with an explicit configuration and importer registry.
pub fn diff_db_to_file_with(
    config: &DiffConfig,
    registry: &ImporterRegistry,
    old: &dyn RecordStore,
    path: &Path,
    progress: &mut dyn Progress,
) -> DiffResult<Option<DbDiff>> {
    let new = InMemoryRecordStore::new();
    let Some(stats) = registry.import_file(path, &new, progress)? else {
        info!(path = %path.display(), "file format not supported; nothing to compare");
        return Ok(None);
    };
    info!(path = %path.display(), records = stats.total(), "comparing against file");
    diff_dbs_with(config, old, &new, progress).map(Some)
}
