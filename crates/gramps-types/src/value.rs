//! The canonical struct: a record flattened into nested values.
//!
//! Structs are exchanged as JSON. Scalars, sequences and mappings map
//! one-to-one; a [`RefHandle`] is written as a tagged mapping:
//!
//! ```json
//! {"_class": "Handle", "classname": "Person", "handle": "P1"}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::category::Category;
use crate::handle::{Handle, RefHandle};

/// Reserved key holding an entity's type name.
pub const CLASS_KEY: &str = "_class";

/// Reserved key holding an entity's stable identifier.
pub const HANDLE_KEY: &str = "handle";

/// `_class` tag marking a serialized reference handle.
const REFERENCE_CLASS: &str = "Handle";

/// A canonical struct value.
///
/// Two JSON conversions are lossy: an integer above `i64::MAX` is read as
/// a [`Value::Float`], and a non-finite float is written as `null`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Json", into = "Json")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Also holds integers too large for `i64`, with `f64` precision.
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Pointer to another record; not itself traversable.
    Reference(RefHandle),
}

impl Value {
    /// Build a mapping from key/value pairs.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a reference value.
    pub fn reference(classname: Category, handle: Handle) -> Self {
        Value::Reference(RefHandle::new(classname, handle))
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Reference(_) => "reference",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&RefHandle> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// The `_class` tag of an entity mapping, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.get(CLASS_KEY).and_then(Value::as_str)
    }

    /// Convert to plain JSON.
    pub fn to_json(&self) -> Json {
        Json::from(self.clone())
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                if let Some(reference) = decode_reference(&map) {
                    return Value::Reference(reference);
                }
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for Json {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Int(i) => Json::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Str(s) => Json::String(s),
            Value::List(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Map(map) => Json::Object(map.into_iter().map(|(k, v)| (k, Json::from(v))).collect()),
            Value::Reference(r) => {
                let mut obj = serde_json::Map::new();
                obj.insert(CLASS_KEY.into(), Json::String(REFERENCE_CLASS.into()));
                obj.insert("classname".into(), Json::String(r.classname.as_str().into()));
                obj.insert(HANDLE_KEY.into(), Json::String(r.handle.as_str().into()));
                Json::Object(obj)
            }
        }
    }
}

fn decode_reference(map: &serde_json::Map<String, Json>) -> Option<RefHandle> {
    if map.len() != 3 || map.get(CLASS_KEY)?.as_str()? != REFERENCE_CLASS {
        return None;
    }
    let classname = map.get("classname")?.as_str()?.parse().ok()?;
    let handle = Handle::new(map.get(HANDLE_KEY)?.as_str()?).ok()?;
    Some(RefHandle::new(classname, handle))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<RefHandle> for Value {
    fn from(r: RefHandle) -> Self {
        Value::Reference(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_ref(h: &str) -> Value {
        Value::reference(Category::Person, Handle::new(h).unwrap())
    }

    #[test]
    fn json_scalars_map_to_variants() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!("x")), Value::Str("x".into()));
    }

    #[test]
    fn tagged_mapping_decodes_as_reference() {
        let v = Value::from(json!({"_class": "Handle", "classname": "Person", "handle": "P1"}));
        assert_eq!(v, person_ref("P1"));
    }

    #[test]
    fn reference_with_unknown_class_stays_a_mapping() {
        let v = Value::from(json!({"_class": "Handle", "classname": "Spaceship", "handle": "S1"}));
        assert!(matches!(v, Value::Map(_)));
    }

    #[test]
    fn reference_encodes_as_tagged_mapping() {
        let json = person_ref("P1").to_json();
        assert_eq!(json, json!({"_class": "Handle", "classname": "Person", "handle": "P1"}));
    }

    #[test]
    fn serde_goes_through_json_shape() {
        let v = Value::map([
            ("_class", Value::from("Family")),
            ("father_handle", person_ref("P1")),
            ("child_ref_list", Value::List(vec![])),
        ]);
        let text = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn display_is_compact_json() {
        let v = Value::map([("a", Value::Int(1)), ("b", Value::List(vec![Value::Null]))]);
        assert_eq!(v.to_string(), r#"{"a":1,"b":[null]}"#);
    }

    #[test]
    fn lossy_number_conversions() {
        let big = Value::from(json!(u64::MAX));
        assert_eq!(big, Value::Float(u64::MAX as f64));
        assert_eq!(Value::Float(f64::NAN).to_json(), Json::Null);
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "null");
    }

    #[test]
    fn accessors() {
        let v = Value::map([("_class", Value::from("Note")), ("text", Value::from("hi"))]);
        assert_eq!(v.class_name(), Some("Note"));
        assert_eq!(v.get("text").and_then(Value::as_str), Some("hi"));
        assert!(v.get("missing").is_none());
        assert_eq!(Value::Int(3).type_name(), "int");
    }
}
