//! Moving Gramps records between files and record stores.
//!
//! Importers are chosen by file extension through an [`ImporterRegistry`].
//! The default registry knows one format, [`JsonImporter`], which reads
//! canonical record structs either as a JSON array or as one struct per
//! line. [`export_json`] writes the line form.
//!
//! Imports are transactional: a file either lands in the store completely
//! or not at all.

pub mod error;
pub mod export;
pub mod import;

pub use error::{ImportError, ImportResult};
pub use export::export_json;
pub use import::{import_file, ImportStats, Importer, ImporterRegistry, JsonImporter};
