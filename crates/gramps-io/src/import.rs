//! Importers: populate a record store from a file.
//!
//! An [`ImporterRegistry`] picks the importer by file extension. A file no
//! importer claims is not an error; [`ImporterRegistry::import_file`]
//! reports it as `Ok(None)` so callers can tell "nothing imported" apart
//! from a failed import.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use gramps_store::{with_transaction, RecordStore};
use gramps_struct::reconstruct;
use gramps_types::{Category, Progress, Value};
use serde_json::Value as Json;
use tracing::{debug, info};

use crate::error::ImportResult;

/// Summary of a completed import.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Records added, per category.
    pub counts: BTreeMap<Category, usize>,
}

impl ImportStats {
    /// Total number of records added.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of records added in one category.
    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }
}

/// A file format that can be loaded into a record store.
pub trait Importer: Send + Sync {
    /// Short format name, used in logs.
    fn name(&self) -> &str;

    /// Lowercase file extensions this importer claims, without the dot.
    fn extensions(&self) -> &[&str];

    /// Load every record in `path` into `store`.
    ///
    /// Either every record is added or none is.
    fn import(
        &self,
        path: &Path,
        store: &dyn RecordStore,
        progress: &mut dyn Progress,
    ) -> ImportResult<ImportStats>;
}

/// Importer for record structs serialized as JSON.
///
/// Accepts either a single JSON array of structs or a stream of structs
/// separated by whitespace (one per line being the usual layout).
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonImporter;

impl JsonImporter {
    /// Decode file contents into record structs.
    pub fn parse(text: &str) -> ImportResult<Vec<Value>> {
        let documents = serde_json::Deserializer::from_str(text)
            .into_iter::<Json>()
            .collect::<Result<Vec<_>, _>>()?;
        let structs = match <[Json; 1]>::try_from(documents) {
            Ok([Json::Array(items)]) => items,
            Ok([single]) => vec![single],
            Err(documents) => documents,
        };
        Ok(structs.into_iter().map(Value::from).collect())
    }
}

impl Importer for JsonImporter {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json", "jsonl"]
    }

    fn import(
        &self,
        path: &Path,
        store: &dyn RecordStore,
        progress: &mut dyn Progress,
    ) -> ImportResult<ImportStats> {
        let text = fs::read_to_string(path)?;
        let structs = Self::parse(&text)?;
        let message = format!("Import {}", path.display());

        progress.begin(&message, structs.len());
        let result: ImportResult<ImportStats> = with_transaction(store, &message, |txn| {
            let mut stats = ImportStats::default();
            for value in &structs {
                let record = reconstruct(value)?;
                *stats.counts.entry(record.category()).or_default() += 1;
                store.add(txn, record)?;
                progress.step();
            }
            Ok(stats)
        });
        progress.end();

        let stats = result?;
        info!(path = %path.display(), records = stats.total(), "import complete");
        Ok(stats)
    }
}

/// The set of importers available for loading files.
pub struct ImporterRegistry {
    importers: Vec<Box<dyn Importer>>,
}

impl ImporterRegistry {
    /// A registry with no importers.
    pub fn empty() -> Self {
        Self {
            importers: Vec::new(),
        }
    }

    /// Add an importer. Earlier registrations win on extension clashes.
    pub fn register(&mut self, importer: Box<dyn Importer>) {
        self.importers.push(importer);
    }

    /// The importer claiming the file's extension, if any.
    pub fn find(&self, path: &Path) -> Option<&dyn Importer> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.importers
            .iter()
            .find(|importer| importer.extensions().contains(&extension.as_str()))
            .map(|importer| importer.as_ref())
    }

    /// Import `path` into `store` with whichever importer claims it.
    ///
    /// Returns `Ok(None)` if no importer handles the file's extension.
    pub fn import_file(
        &self,
        path: &Path,
        store: &dyn RecordStore,
        progress: &mut dyn Progress,
    ) -> ImportResult<Option<ImportStats>> {
        let Some(importer) = self.find(path) else {
            debug!(path = %path.display(), "no importer for file");
            return Ok(None);
        };
        debug!(path = %path.display(), importer = importer.name(), "importing");
        importer.import(path, store, progress).map(Some)
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(JsonImporter));
        registry
    }
}

impl fmt::Debug for ImporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.importers.iter().map(|i| i.name()).collect();
        f.debug_struct("ImporterRegistry")
            .field("importers", &names)
            .finish()
    }
}

/// Import `path` into `store` using the default registry.
pub fn import_file(
    path: &Path,
    store: &dyn RecordStore,
    progress: &mut dyn Progress,
) -> ImportResult<Option<ImportStats>> {
    ImporterRegistry::default().import_file(path, store, progress)
}
