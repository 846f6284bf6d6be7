//! Diff engine for Gramps family trees.
//!
//! Decides whether two record structs differ in a way a genealogist would
//! care about, and compares whole record stores by merge-joining their
//! sorted handles category by category.
//!
//! # Key Types
//!
//! - [`structs_differ`] / [`dates_differ`] / [`StructDiffer`] -- Struct comparison
//! - [`DbDiff`] / [`ChangedRecord`] / [`MissingRecord`] -- Database-pair diff
//! - [`diff_db_to_file`] -- Diff a store against an importable file
//! - [`StructTextDiff`] / [`DiffHunk`] / [`DiffLine`] -- Line diff of rendered structs
//! - [`DiffConfig`] -- Ignored keys, date key and category order

pub mod config;
pub mod db_diff;
pub mod error;
pub mod file;
pub mod structs;
pub mod text_diff;

pub use config::DiffConfig;
pub use db_diff::{diff_dbs, diff_dbs_with, ChangedRecord, DbDiff, MissingRecord};
pub use error::{DiffError, DiffResult};
pub use file::{diff_db_to_file, diff_db_to_file_with};
pub use structs::{dates_differ, empty_dateval, structs_differ, StructDiffer};
pub use text_diff::{diff_struct_text, render, DiffHunk, DiffLine, StructTextDiff};
