//! Class-dispatch reconstruction of live records from structs.

use gramps_types::value::CLASS_KEY;
use gramps_types::{
    Category, Citation, Entity, Event, Family, Media, Note, Person, Place, Record, Repository,
    Source, Tag, TypeError, Value,
};

use crate::error::{StructError, StructResult};

type Reconstructor = fn(&Value) -> Result<Record, TypeError>;

/// Decode with the entity's own decoder, then finish with its constructor.
fn build<E: Entity + Into<Record>>(value: &Value) -> Result<Record, TypeError> {
    Ok(E::create(E::from_struct(value)?).into())
}

/// One row per entity type; adding a type means adding a row.
static RECONSTRUCTORS: [(Category, Reconstructor); 10] = [
    (Category::Person, build::<Person>),
    (Category::Family, build::<Family>),
    (Category::Event, build::<Event>),
    (Category::Source, build::<Source>),
    (Category::Place, build::<Place>),
    (Category::Citation, build::<Citation>),
    (Category::Repository, build::<Repository>),
    (Category::Media, build::<Media>),
    (Category::Note, build::<Note>),
    (Category::Tag, build::<Tag>),
];

/// Rebuild a live record from its struct, dispatching on `_class`.
///
/// Fails with [`StructError::InvalidStruct`] when the value is not a
/// mapping, has no `_class`, names an unknown class, or does not decode.
pub fn reconstruct(value: &Value) -> StructResult<Record> {
    let map = value
        .as_map()
        .ok_or_else(|| StructError::invalid_struct(format!("expected a mapping, got {}", value.type_name())))?;
    let class = map
        .get(CLASS_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| StructError::invalid_struct("missing _class"))?;
    let (_, build) = RECONSTRUCTORS
        .iter()
        .find(|(category, _)| category.as_str() == class)
        .ok_or_else(|| StructError::invalid_struct(format!("unknown _class {class:?}")))?;
    build(value).map_err(|e| StructError::invalid_struct(e.to_string()))
}
