//! The path-addressable struct facade.
//!
//! A [`Struct`] wraps one canonical struct and, optionally, the record store
//! it came from. Paths are walked one segment at a time:
//!
//! - on a sequence, the segment is an index (negative counts from the end)
//! - on a mapping, the segment is a key (quotes are stripped)
//! - on a string, the segment names a builtin method, and a following
//!   `(...)` segment calls it
//!
//! Whenever a step lands on a reference handle and a store is attached, the
//! target record is fetched and wrapped in a nested `Struct`, so a path
//! crosses from one record into another as if the target were inline.
//!
//! Any step that misses makes the whole lookup yield `None`.

use std::fmt;

use gramps_store::{with_transaction, RecordStore};
use gramps_types::{Category, Handle, RefHandle, Value};
use tracing::debug;

use crate::error::{StructError, StructResult};
use crate::literal::parse_arguments;
use crate::method::Method;
use crate::path::{is_arguments, parse, unquote};
use crate::reconstruct::reconstruct;

/// Transaction message used when a mutation is committed back.
const EDIT_MESSAGE: &str = "Edit struct";

/// What a path lookup landed on.
#[derive(Clone, Debug)]
pub enum Node<'a> {
    /// A plain value (a reference handle stays a value when no store is attached).
    Value(Value),
    /// A referenced record, resolved through the store.
    Struct(Struct<'a>),
    /// A builtin bound to a string, waiting for its arguments segment.
    Method(Method),
}

impl<'a> Node<'a> {
    /// The node as a plain value. A resolved reference yields the target's
    /// struct; a bound method has no value.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Node::Value(v) => Some(v),
            Node::Struct(s) => Some(s.into_value()),
            Node::Method(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            Node::Struct(s) => Some(s.value()),
            Node::Method(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct<'a>> {
        match self {
            Node::Struct(s) => Some(s),
            _ => None,
        }
    }

    fn step(self, segment: &str, db: Option<&'a dyn RecordStore>) -> StructResult<Option<Node<'a>>> {
        match self {
            Node::Struct(s) => s.getitem(segment),
            Node::Value(v) => step_value(&v, segment, db),
            Node::Method(m) if is_arguments(segment) => match parse_arguments(segment) {
                Ok(args) => Ok(m.call(&args).map(Node::Value)),
                Err(err) => {
                    debug!(error = %err, "call arguments rejected");
                    Ok(None)
                }
            },
            Node::Method(_) => Ok(None),
        }
    }
}

/// A canonical struct with optional store-backed reference resolution and
/// commit-back.
#[derive(Clone)]
pub struct Struct<'a> {
    value: Value,
    db: Option<&'a dyn RecordStore>,
}

impl<'a> Struct<'a> {
    /// A detached struct: references stay opaque and mutations stay local.
    pub fn new(value: Value) -> Self {
        Self { value, db: None }
    }

    /// A struct backed by a store: references resolve through `db` and
    /// mutations are committed back into it.
    pub fn with_store(value: Value, db: &'a dyn RecordStore) -> Self {
        Self {
            value,
            db: Some(db),
        }
    }

    /// Load a record from the store and wrap its struct.
    ///
    /// Returns `Ok(None)` if the record does not exist.
    pub fn from_store(
        db: &'a dyn RecordStore,
        category: Category,
        handle: &Handle,
    ) -> StructResult<Option<Self>> {
        Ok(db
            .fetch_struct(category, handle)?
            .map(|value| Self::with_store(value, db)))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn store(&self) -> Option<&'a dyn RecordStore> {
        self.db
    }

    /// Resolve a reference through the attached store.
    ///
    /// Returns `Ok(None)` when no store is attached or the target is absent.
    pub fn get_ref_struct(&self, reference: &RefHandle) -> StructResult<Option<Struct<'a>>> {
        match self.db {
            Some(db) => resolve_ref(db, reference),
            None => Ok(None),
        }
    }

    /// Look up a single segment.
    pub fn getitem(&self, segment: &str) -> StructResult<Option<Node<'a>>> {
        step_value(&self.value, segment, self.db)
    }

    /// Look up a path expression.
    ///
    /// Returns `Ok(None)` if any step misses. Errors only come from the
    /// store while resolving references. The empty path yields the struct
    /// itself.
    pub fn get(&self, path: &str) -> StructResult<Option<Node<'a>>> {
        let segments = parse(path);
        let Some((first, rest)) = segments.split_first() else {
            return Ok(Some(Node::Struct(self.clone())));
        };

        let Some(mut node) = self.getitem(first)? else {
            debug!(path, segment = %first, "path lookup missed");
            return Ok(None);
        };
        for segment in rest {
            match node.step(segment, self.db)? {
                Some(next) => node = next,
                None => {
                    debug!(path, segment = %segment, "path lookup missed");
                    return Ok(None);
                }
            }
        }
        Ok(Some(node))
    }

    /// Look up a path expression and return the plain value found there.
    pub fn get_value(&self, path: &str) -> StructResult<Option<Value>> {
        Ok(self.get(path)?.and_then(Node::into_value))
    }

    /// Assign `value` at a path expression.
    ///
    /// The container addressed by all but the last segment is mutated:
    /// a sequence at an in-range index, or a mapping at an existing key
    /// (a missing key fails with [`StructError::NoSuchProperty`]). When the
    /// path crosses a reference, the rest of the path is applied to the
    /// referenced record instead. Any other target is silently ignored.
    ///
    /// With a store attached, the owning record is rebuilt from its struct
    /// and committed in one transaction; the facade only keeps the new
    /// value once that commit succeeded.
    pub fn set(&mut self, path: &str, value: Value) -> StructResult<()> {
        self.try_set(path, value).map(|_| ())
    }

    /// Like [`set`](Self::set), returning `false` when the assignment was
    /// silently ignored.
    pub fn try_set(&mut self, path: &str, value: Value) -> StructResult<bool> {
        let segments = parse(path);
        let outcome = self.set_segments(&segments, value)?;
        Ok(outcome != Assigned::Dropped)
    }

    /// Commit the current struct into the attached store.
    ///
    /// The record is committed when its handle already exists and added
    /// otherwise. Without a store this does nothing.
    pub fn update_db(&self) -> StructResult<()> {
        match self.db {
            Some(db) => commit_struct(db, &self.value),
            None => Ok(()),
        }
    }

    fn set_segments(&mut self, segments: &[String], value: Value) -> StructResult<Assigned> {
        let Some((last, parents)) = segments.split_last() else {
            return Ok(Assigned::Dropped);
        };

        // Copy-on-write: other facades built from the same struct never
        // observe this edit, and a failed commit leaves this one untouched.
        let mut updated = self.value.clone();
        let outcome = assign(&mut updated, parents, last, value, self.db)?;
        match outcome {
            Assigned::Local => {
                if let Some(db) = self.db {
                    commit_struct(db, &updated)?;
                }
                self.value = updated;
            }
            Assigned::Delegated => {}
            Assigned::Dropped => {
                debug!(path = %segments.join("."), "set target is not mutable; ignored");
            }
        }
        Ok(outcome)
    }
}

impl fmt::Display for Struct<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for Struct<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Struct")
            .field("value", &self.value)
            .field("has_store", &self.db.is_some())
            .finish()
    }
}

/// Outcome of an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Assigned {
    /// This struct changed and must be committed.
    Local,
    /// A referenced record changed and was committed by its own facade.
    Delegated,
    /// Nothing could be assigned.
    Dropped,
}

fn step_value<'a>(
    value: &Value,
    segment: &str,
    db: Option<&'a dyn RecordStore>,
) -> StructResult<Option<Node<'a>>> {
    let child = match value {
        Value::List(items) => match list_index(items.len(), segment) {
            Some(i) => items[i].clone(),
            None => return Ok(None),
        },
        Value::Map(map) => match map.get(unquote(segment)) {
            Some(v) => v.clone(),
            None => return Ok(None),
        },
        other => return Ok(Method::bind(other, segment).map(Node::Method)),
    };
    resolve(child, db)
}

fn resolve<'a>(value: Value, db: Option<&'a dyn RecordStore>) -> StructResult<Option<Node<'a>>> {
    match (value, db) {
        (Value::Reference(r), Some(db)) => Ok(resolve_ref(db, &r)?.map(Node::Struct)),
        (value, _) => Ok(Some(Node::Value(value))),
    }
}

fn resolve_ref<'a>(db: &'a dyn RecordStore, r: &RefHandle) -> StructResult<Option<Struct<'a>>> {
    let resolved = Struct::from_store(db, r.classname, &r.handle)?;
    if resolved.is_none() {
        debug!(reference = %r, "dangling reference");
    }
    Ok(resolved)
}

/// Resolve a sequence index; negative indexes count from the end.
fn list_index(len: usize, segment: &str) -> Option<usize> {
    let index: i64 = segment.parse().ok()?;
    let index = if index < 0 {
        i64::try_from(len).ok()? + index
    } else {
        index
    };
    usize::try_from(index).ok().filter(|i| *i < len)
}

fn assign(
    target: &mut Value,
    parents: &[String],
    last: &str,
    value: Value,
    db: Option<&dyn RecordStore>,
) -> StructResult<Assigned> {
    if let Value::Reference(r) = target {
        return match db {
            Some(db) => assign_through(db, r, parents, last, value),
            None => Ok(Assigned::Dropped),
        };
    }

    if let Some((segment, rest)) = parents.split_first() {
        let child = match target {
            Value::List(items) => match list_index(items.len(), segment) {
                Some(i) => items.get_mut(i),
                None => None,
            },
            Value::Map(map) => map.get_mut(unquote(segment)),
            _ => None,
        };
        return match child {
            Some(child) => assign(child, rest, last, value, db),
            None => Ok(Assigned::Dropped),
        };
    }

    match target {
        Value::List(items) => match list_index(items.len(), last) {
            Some(i) => {
                items[i] = value;
                Ok(Assigned::Local)
            }
            None => Ok(Assigned::Dropped),
        },
        Value::Map(map) => match map.get_mut(unquote(last)) {
            Some(slot) => {
                *slot = value;
                Ok(Assigned::Local)
            }
            None => Err(StructError::NoSuchProperty(last.to_string())),
        },
        _ => Ok(Assigned::Dropped),
    }
}

/// Apply the rest of a path to the record a reference points at.
fn assign_through(
    db: &dyn RecordStore,
    reference: &RefHandle,
    parents: &[String],
    last: &str,
    value: Value,
) -> StructResult<Assigned> {
    let Some(mut target) = resolve_ref(db, reference)? else {
        return Ok(Assigned::Dropped);
    };
    let mut segments = parents.to_vec();
    segments.push(last.to_string());
    Ok(match target.set_segments(&segments, value)? {
        Assigned::Dropped => Assigned::Dropped,
        _ => Assigned::Delegated,
    })
}

/// Rebuild the record owning `value` and write it in one transaction.
fn commit_struct(db: &dyn RecordStore, value: &Value) -> StructResult<()> {
    with_transaction(db, EDIT_MESSAGE, |txn| {
        let record = reconstruct(value)?;
        let category = record.category();
        let handle = record.handle().clone();
        if db.contains(category, &handle)? {
            db.commit(txn, record)?;
        } else {
            db.add(txn, record)?;
        }
        debug!(%category, handle = %handle, "struct committed");
        Ok(())
    })
}
