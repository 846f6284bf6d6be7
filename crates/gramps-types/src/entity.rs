//! Typed genealogical entities and their struct encoding.
//!
//! Each entity type decodes from its canonical struct in two steps: a
//! decoder ([`Entity::from_struct`]) that validates the struct and extracts
//! an intermediate [`EntityData`], and a finisher ([`Entity::create`]) that
//! builds the typed entity. Encoding back ([`Entity::to_struct`]) reproduces
//! every field the decoder saw.

use std::collections::BTreeMap;

use crate::category::Category;
use crate::error::TypeError;
use crate::handle::Handle;
use crate::value::{Value, CLASS_KEY, HANDLE_KEY};

/// Key of the last-modified timestamp.
pub const CHANGE_KEY: &str = "change";

/// Key of the user-visible identifier (e.g. `I0001`).
pub const GRAMPS_ID_KEY: &str = "gramps_id";

/// Decoded contents of an entity struct, shared by all entity types.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityData {
    pub handle: Handle,
    pub gramps_id: Option<String>,
    /// Last-modified timestamp, seconds since the epoch.
    pub change: i64,
    /// Every other field of the struct, verbatim. A `gramps_id` given as
    /// null is kept here.
    pub fields: BTreeMap<String, Value>,
}

impl EntityData {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            gramps_id: None,
            change: 0,
            fields: BTreeMap::new(),
        }
    }

    /// Decode the struct of an entity of the given category.
    pub fn decode(category: Category, value: &Value) -> Result<Self, TypeError> {
        let class = category.as_str();
        let map = value.as_map().ok_or_else(|| TypeError::NotAMapping {
            class: class.to_string(),
            actual: value.type_name().to_string(),
        })?;

        match map.get(CLASS_KEY).and_then(Value::as_str) {
            Some(actual) if actual == class => {}
            other => {
                return Err(TypeError::ClassMismatch {
                    expected: class.to_string(),
                    actual: other.unwrap_or("<missing>").to_string(),
                })
            }
        }

        let handle = match map.get(HANDLE_KEY) {
            Some(Value::Str(s)) => Handle::new(s.as_str())?,
            other => return Err(invalid_field(class, HANDLE_KEY, "expected a string", other)),
        };

        let gramps_id = match map.get(GRAMPS_ID_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Str(s)) => Some(s.clone()),
            other => return Err(invalid_field(class, GRAMPS_ID_KEY, "expected a string", other)),
        };

        let change = match map.get(CHANGE_KEY) {
            None => 0,
            Some(Value::Int(i)) => *i,
            other => return Err(invalid_field(class, CHANGE_KEY, "expected an integer", other)),
        };

        // An explicit null id stays in `fields` so encoding reproduces it.
        let fields = map
            .iter()
            .filter(|(k, v)| match k.as_str() {
                CLASS_KEY | HANDLE_KEY | CHANGE_KEY => false,
                GRAMPS_ID_KEY => v.is_null(),
                _ => true,
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            handle,
            gramps_id,
            change,
            fields,
        })
    }

    /// Encode back into a struct tagged with the category's class name.
    pub fn encode(&self, category: Category) -> Value {
        let mut map = self.fields.clone();
        map.insert(CLASS_KEY.into(), Value::from(category.as_str()));
        map.insert(HANDLE_KEY.into(), Value::from(self.handle.as_str()));
        map.insert(CHANGE_KEY.into(), Value::Int(self.change));
        if let Some(id) = &self.gramps_id {
            map.insert(GRAMPS_ID_KEY.into(), Value::from(id.as_str()));
        }
        Value::Map(map)
    }
}

fn invalid_field(class: &str, field: &str, reason: &str, got: Option<&Value>) -> TypeError {
    let got = got.map(Value::type_name).unwrap_or("nothing");
    TypeError::InvalidField {
        class: class.to_string(),
        field: field.to_string(),
        reason: format!("{reason}, got {got}"),
    }
}

/// A genealogical entity with a canonical struct form.
pub trait Entity: Sized {
    /// The category (and `_class` tag) of this entity type.
    const CATEGORY: Category;

    fn data(&self) -> &EntityData;

    fn data_mut(&mut self) -> &mut EntityData;

    /// Finisher: build the entity from decoded data.
    fn create(data: EntityData) -> Self;

    /// Decoder: validate a struct and extract its data.
    fn from_struct(value: &Value) -> Result<EntityData, TypeError> {
        EntityData::decode(Self::CATEGORY, value)
    }

    fn to_struct(&self) -> Value {
        self.data().encode(Self::CATEGORY)
    }

    /// Canonical byte form, for identity checks that do not walk the struct.
    fn serialize(&self) -> Vec<u8> {
        self.to_struct().to_string().into_bytes()
    }

    fn handle(&self) -> &Handle {
        &self.data().handle
    }

    fn gramps_id(&self) -> Option<&str> {
        self.data().gramps_id.as_deref()
    }

    fn change(&self) -> i64 {
        self.data().change
    }

    /// A field other than the reserved header keys.
    fn field(&self, key: &str) -> Option<&Value> {
        self.data().fields.get(key)
    }
}

macro_rules! entity {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(EntityData);

        impl $name {
            pub fn new(handle: Handle) -> Self {
                Self(EntityData::new(handle))
            }

            pub fn with_gramps_id(mut self, id: impl Into<String>) -> Self {
                self.0.gramps_id = Some(id.into());
                self
            }

            pub fn with_change(mut self, change: i64) -> Self {
                self.0.change = change;
                self
            }

            pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.0.fields.insert(key.into(), value.into());
                self
            }
        }

        impl Entity for $name {
            const CATEGORY: Category = Category::$name;

            fn data(&self) -> &EntityData {
                &self.0
            }

            fn data_mut(&mut self) -> &mut EntityData {
                &mut self.0
            }

            fn create(data: EntityData) -> Self {
                Self(data)
            }
        }
    };
}

entity!(
    /// An individual.
    Person
);
entity!(
    /// A couple and their children.
    Family
);
entity!(
    /// A dated, placed occurrence (birth, marriage, census, ...).
    Event
);
entity!(Source);
entity!(Place);
entity!(
    /// A pointer into a source, with confidence and page.
    Citation
);
entity!(Repository);
entity!(
    /// A media object (image, document, recording).
    Media
);
entity!(Note);
entity!(Tag);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn h(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    #[test]
    fn decode_then_encode_reproduces_struct() {
        let value = Value::from(json!({
            "_class": "Person",
            "handle": "P1",
            "gramps_id": "I001",
            "change": 1000,
            "gender": 1,
            "primary_name": {"first_name": "Sarah"}
        }));
        let person = Person::create(Person::from_struct(&value).unwrap());
        assert_eq!(person.handle(), &h("P1"));
        assert_eq!(person.gramps_id(), Some("I001"));
        assert_eq!(person.change(), 1000);
        assert_eq!(person.field("gender"), Some(&Value::Int(1)));
        assert_eq!(person.to_struct(), value);
    }

    #[test]
    fn missing_change_defaults_to_zero() {
        let value = Value::from(json!({"_class": "Tag", "handle": "T1", "name": "todo"}));
        let data = Tag::from_struct(&value).unwrap();
        assert_eq!(data.change, 0);
        assert_eq!(data.gramps_id, None);
    }

    #[test]
    fn null_gramps_id_is_reproduced() {
        let value = Value::from(json!({
            "_class": "Person", "handle": "P1", "gramps_id": null, "change": 1, "nick": "x"
        }));
        let person = Person::create(Person::from_struct(&value).unwrap());
        assert_eq!(person.gramps_id(), None);
        assert_eq!(person.to_struct(), value);

        let renumbered = person.with_gramps_id("I001").to_struct();
        assert_eq!(renumbered.get("gramps_id"), Some(&Value::from("I001")));
    }

    #[test]
    fn class_mismatch_is_rejected() {
        let value = Value::from(json!({"_class": "Family", "handle": "F1"}));
        let err = Person::from_struct(&value).unwrap_err();
        assert_eq!(
            err,
            TypeError::ClassMismatch {
                expected: "Person".into(),
                actual: "Family".into()
            }
        );
    }

    #[test]
    fn non_mapping_is_rejected() {
        let err = Note::from_struct(&Value::Int(3)).unwrap_err();
        assert!(matches!(err, TypeError::NotAMapping { .. }));
    }

    #[test]
    fn handle_must_be_a_string() {
        let value = Value::from(json!({"_class": "Event", "handle": 7}));
        let err = Event::from_struct(&value).unwrap_err();
        assert!(matches!(err, TypeError::InvalidField { ref field, .. } if field == "handle"));
    }

    #[test]
    fn change_must_be_an_integer() {
        let value = Value::from(json!({"_class": "Event", "handle": "E1", "change": "yesterday"}));
        assert!(Event::from_struct(&value).is_err());
    }

    #[test]
    fn builder_sets_header_and_fields() {
        let note = Note::new(h("N1"))
            .with_gramps_id("N0001")
            .with_change(5)
            .with_field("text", "hello");
        let s = note.to_struct();
        assert_eq!(s.class_name(), Some("Note"));
        assert_eq!(s.get("gramps_id"), Some(&Value::from("N0001")));
        assert_eq!(s.get("change"), Some(&Value::Int(5)));
        assert_eq!(s.get("text"), Some(&Value::from("hello")));
    }

    #[test]
    fn serialize_is_stable_for_equal_entities() {
        let a = Source::new(h("S1")).with_field("title", "Parish register");
        let b = Source::new(h("S1")).with_field("title", "Parish register");
        assert_eq!(a.serialize(), b.serialize());
        let c = b.with_field("title", "Census");
        assert_ne!(a.serialize(), c.serialize());
    }
}
