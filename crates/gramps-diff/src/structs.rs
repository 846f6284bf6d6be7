//! Struct-level diff: decide whether two record structs differ meaningfully.
//!
//! Comparison is deliberately lenient:
//!
//! - the `change` timestamp is never compared
//! - dates compare by their calendar value or their text, whichever matches
//! - keys present only in the second mapping are ignored
//!
//! The first difference found short-circuits the walk; its field path is
//! logged at `trace` level.

use std::fmt;

use gramps_types::Value;
use tracing::trace;

use crate::config::DiffConfig;

/// Key of a date's calendar value.
pub const DATEVAL_KEY: &str = "dateval";

/// Key of a date's free-form text.
pub const TEXT_KEY: &str = "text";

/// The calendar value of an empty date: day, month, year, slash flag.
pub fn empty_dateval() -> Value {
    Value::List(vec![
        Value::Int(0),
        Value::Int(0),
        Value::Int(0),
        Value::Bool(false),
    ])
}

fn is_empty_dateval(value: &Value) -> bool {
    matches!(
        value.as_list().map(Vec::as_slice),
        Some([Value::Int(0), Value::Int(0), Value::Int(0), Value::Bool(false)])
    )
}

/// Returns `true` if two date structs differ.
///
/// Dates are the same when they are equal, or when both are mappings and
/// either their calendar values match (and are not the empty date) or their
/// texts match. A key missing on either side never matches.
pub fn dates_differ(a: &Value, b: &Value) -> bool {
    if a == b {
        return false;
    }
    let (Some(a), Some(b)) = (a.as_map(), b.as_map()) else {
        return true;
    };

    if let (Some(x), Some(y)) = (a.get(DATEVAL_KEY), b.get(DATEVAL_KEY)) {
        if x == y && !is_empty_dateval(y) {
            return false;
        }
    }
    if let (Some(x), Some(y)) = (a.get(TEXT_KEY), b.get(TEXT_KEY)) {
        if x == y {
            return false;
        }
    }
    true
}

/// Returns `true` if two structs differ, using the default configuration.
///
/// `path` names the position of `a` and `b` within the record and only
/// appears in trace output.
pub fn structs_differ(path: &str, a: &Value, b: &Value) -> bool {
    StructDiffer::new(&DiffConfig::default()).differ(path, a, b)
}

/// A struct comparator bound to a [`DiffConfig`].
#[derive(Clone, Copy, Debug)]
pub struct StructDiffer<'a> {
    config: &'a DiffConfig,
}

impl<'a> StructDiffer<'a> {
    pub fn new(config: &'a DiffConfig) -> Self {
        Self { config }
    }

    /// Returns `true` if `a` and `b` differ.
    ///
    /// - sequences differ on length or on the first differing position
    /// - mappings are walked over the keys of `a` only; ignored keys are
    ///   skipped, the date key uses [`dates_differ`], and a key missing
    ///   from `b` compares against null
    /// - anything else differs unless equal
    pub fn differ(&self, path: &str, a: &Value, b: &Value) -> bool {
        self.differ_at(FieldPath::Root(path), a, b)
    }

    fn differ_at(&self, path: FieldPath<'_>, a: &Value, b: &Value) -> bool {
        if a == b {
            return false;
        }
        match (a, b) {
            (Value::List(xs), Value::List(ys)) => {
                if xs.len() != ys.len() {
                    trace!(%path, old = xs.len(), new = ys.len(), "sequence length differs");
                    return true;
                }
                xs.iter()
                    .zip(ys)
                    .enumerate()
                    .any(|(i, (x, y))| self.differ_at(FieldPath::Index(&path, i), x, y))
            }
            (Value::Map(xs), Value::Map(ys)) => xs.iter().any(|(key, x)| {
                if self.config.is_ignored(key) {
                    return false;
                }
                let y = ys.get(key).unwrap_or(&Value::Null);
                let child = FieldPath::Key(&path, key);
                if self.config.is_date_key(key) {
                    let differs = dates_differ(x, y);
                    if differs {
                        trace!(path = %child, "date differs");
                    }
                    differs
                } else {
                    self.differ_at(child, x, y)
                }
            }),
            _ => {
                trace!(%path, old = %a, new = %b, "value differs");
                true
            }
        }
    }
}

/// Position of a value within a record, only rendered when traced.
#[derive(Clone, Copy)]
enum FieldPath<'p> {
    Root(&'p str),
    Index(&'p FieldPath<'p>, usize),
    Key(&'p FieldPath<'p>, &'p str),
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Root(root) => f.write_str(root),
            FieldPath::Index(parent, i) => write!(f, "{parent}[{i}]"),
            FieldPath::Key(parent, key) => write!(f, "{parent}.{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn date(dateval: serde_json::Value, text: &str) -> Value {
        v(json!({"_class": "Date", "dateval": dateval, "text": text, "quality": 0}))
    }

    // ---- dates ----

    #[test]
    fn equal_dates_do_not_differ() {
        let d = date(json!([2, 3, 1850, false]), "2 March 1850");
        assert!(!dates_differ(&d, &d));
    }

    #[test]
    fn same_dateval_different_text() {
        let a = date(json!([2, 3, 1850, false]), "2 March 1850");
        let b = date(json!([2, 3, 1850, false]), "1850-03-02");
        assert!(!dates_differ(&a, &b));
    }

    #[test]
    fn same_text_different_dateval() {
        let a = date(json!([2, 3, 1850, false]), "about 1850");
        let b = date(json!([0, 0, 1850, false]), "about 1850");
        assert!(!dates_differ(&a, &b));
    }

    #[test]
    fn both_differing() {
        let a = date(json!([2, 3, 1850, false]), "2 March 1850");
        let b = date(json!([2, 3, 1851, false]), "2 March 1851");
        assert!(dates_differ(&a, &b));
    }

    #[test]
    fn empty_dateval_does_not_count_as_match() {
        let a = date(json!([0, 0, 0, false]), "sometime");
        let b = date(json!([0, 0, 0, false]), "never");
        assert!(dates_differ(&a, &b));
        assert_eq!(a.get(DATEVAL_KEY), Some(&empty_dateval()));
    }

    #[test]
    fn non_mapping_dates_differ_unless_equal() {
        assert!(!dates_differ(&Value::Null, &Value::Null));
        assert!(dates_differ(&Value::Null, &date(json!([0, 0, 1850, false]), "1850")));
        assert!(dates_differ(&Value::from("1850"), &Value::from("1851")));
    }

    #[test]
    fn missing_keys_never_match() {
        let a = v(json!({"dateval": [1, 1, 1900, false]}));
        let b = v(json!({"dateval": [1, 1, 1901, false]}));
        assert!(dates_differ(&a, &b));
        let a = v(json!({"text": "x", "quality": 1}));
        let b = v(json!({"quality": 2}));
        assert!(dates_differ(&a, &b));
    }

    // ---- structs ----

    #[test]
    fn change_only_does_not_differ() {
        let a = v(json!({"_class": "Person", "handle": "P1", "change": 1000}));
        let b = v(json!({"_class": "Person", "handle": "P1", "change": 2000}));
        assert!(!structs_differ("Person", &a, &b));
    }

    #[test]
    fn nested_change_is_also_ignored() {
        let a = v(json!({"note": {"text": "x", "change": 1}}));
        let b = v(json!({"note": {"text": "x", "change": 2}}));
        assert!(!structs_differ("", &a, &b));
    }

    #[test]
    fn scalar_field_differs() {
        let a = v(json!({"_class": "Person", "gramps_id": "I001"}));
        let b = v(json!({"_class": "Person", "gramps_id": "I002"}));
        assert!(structs_differ("Person", &a, &b));
    }

    #[test]
    fn extra_keys_in_second_are_ignored() {
        let a = v(json!({"gramps_id": "I001"}));
        let b = v(json!({"gramps_id": "I001", "nickname": "Sally"}));
        assert!(!structs_differ("", &a, &b));
        assert!(structs_differ("", &b, &a));
    }

    #[test]
    fn key_missing_from_second_compares_as_null() {
        assert!(structs_differ("", &v(json!({"a": 1})), &v(json!({}))));
        assert!(!structs_differ("", &v(json!({"a": null})), &v(json!({}))));
    }

    #[test]
    fn sequences_compare_positionally() {
        assert!(structs_differ("", &v(json!([1, 2])), &v(json!([1, 2, 3]))));
        assert!(structs_differ("", &v(json!([1, 2])), &v(json!([2, 1]))));
        assert!(!structs_differ(
            "",
            &v(json!([{"x": 1, "change": 1}])),
            &v(json!([{"x": 1, "change": 2}]))
        ));
    }

    #[test]
    fn date_key_uses_date_rules() {
        let a = v(json!({"date": {"dateval": [2, 3, 1850, false], "text": "a"}}));
        let b = v(json!({"date": {"dateval": [2, 3, 1850, false], "text": "b"}}));
        assert!(!structs_differ("Event", &a, &b));

        let c = v(json!({"date": {"dateval": [2, 3, 1851, false], "text": "c"}}));
        assert!(structs_differ("Event", &a, &c));
    }

    #[test]
    fn type_mismatch_differs() {
        assert!(structs_differ("", &v(json!({"a": 1})), &v(json!({"a": "1"}))));
        assert!(structs_differ("", &v(json!([])), &v(json!({}))));
    }

    #[test]
    fn configured_keys() {
        let config = DiffConfig {
            ignored_keys: vec!["change".into(), "private".into()],
            date_key: "when".into(),
            ..DiffConfig::default()
        };
        let differ = StructDiffer::new(&config);
        let a = v(json!({"private": true, "when": {"dateval": [1, 1, 1900, false], "text": "x"}}));
        let b = v(json!({"private": false, "when": {"dateval": [1, 1, 1900, false], "text": "y"}}));
        assert!(!differ.differ("", &a, &b));
        assert!(structs_differ("", &a, &b));
    }

    #[test]
    fn field_paths_render_like_accessors() {
        let root = FieldPath::Root("Person");
        let list = FieldPath::Key(&root, "event_ref_list");
        let item = FieldPath::Index(&list, 2);
        assert_eq!(FieldPath::Key(&item, "role").to_string(), "Person.event_ref_list[2].role");
    }

    // ---- properties ----

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,6}".prop_map(Value::Str),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-z]{1,5}", inner, 0..4).prop_map(Value::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn reflexive(value in arb_value()) {
            prop_assert!(!structs_differ("", &value, &value));
        }

        #[test]
        fn extra_keys_never_matter(
            base in prop::collection::btree_map("[a-m]{1,4}", arb_value(), 0..4),
            extra in prop::collection::btree_map("[n-z]{1,4}", arb_value(), 1..3),
        ) {
            let mut wider = base.clone();
            wider.extend(extra);
            prop_assert!(!structs_differ("", &Value::Map(base), &Value::Map(wider)));
        }
    }
}
