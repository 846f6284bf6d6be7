//! JSON export: write a record store out as one struct per line.

use std::io::Write;

use gramps_store::RecordStore;
use gramps_types::Category;
use tracing::info;

use crate::error::ImportResult;

/// Write every record in `store` to `writer`, one compact JSON struct per
/// line.
///
/// Records are grouped by category in [`Category::ALL`] order and sorted by
/// handle within a category, so exporting equal stores yields equal bytes.
/// The output reads back through [`JsonImporter`](crate::JsonImporter).
///
/// Returns the number of records written.
pub fn export_json<W: Write>(store: &dyn RecordStore, mut writer: W) -> ImportResult<usize> {
    let mut written = 0;
    for category in Category::ALL {
        for handle in store.sorted_handles(category)? {
            let Some(value) = store.fetch_struct(category, &handle)? else {
                continue;
            };
            serde_json::to_writer(&mut writer, &value.to_json())?;
            writer.write_all(b"\n")?;
            written += 1;
        }
    }
    writer.flush()?;
    info!(records = written, "export complete");
    Ok(written)
}
