use std::collections::BTreeSet;

use gramps_types::{RefHandle, Value};

/// Collect every reference handle anywhere inside a struct.
///
/// Callers use this to find a record's dependencies (before deleting or
/// exporting it) without knowing the struct's shape.
pub fn collect_references(value: &Value) -> BTreeSet<RefHandle> {
    let mut found = BTreeSet::new();
    walk(value, &mut found);
    found
}

fn walk(value: &Value, found: &mut BTreeSet<RefHandle>) {
    match value {
        Value::Reference(r) => {
            found.insert(r.clone());
        }
        Value::List(items) => items.iter().for_each(|item| walk(item, found)),
        Value::Map(map) => map.values().for_each(|item| walk(item, found)),
        _ => {}
    }
}
