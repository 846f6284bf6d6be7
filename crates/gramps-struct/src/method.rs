//! Builtin callables reachable from a path.
//!
//! String fields expose a small set of methods so that filter paths such as
//! `primary_name.first_name.startswith('Sarah')` can be evaluated. A method
//! segment yields a bound [`Method`]; the following arguments segment calls
//! it.

use gramps_types::Value;

/// A string method name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    StartsWith,
    EndsWith,
    Lower,
    Upper,
    Strip,
    Find,
    Count,
    Replace,
    Split,
    IsDigit,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "startswith" => Builtin::StartsWith,
            "endswith" => Builtin::EndsWith,
            "lower" => Builtin::Lower,
            "upper" => Builtin::Upper,
            "strip" => Builtin::Strip,
            "find" => Builtin::Find,
            "count" => Builtin::Count,
            "replace" => Builtin::Replace,
            "split" => Builtin::Split,
            "isdigit" => Builtin::IsDigit,
            _ => return None,
        })
    }
}

/// A builtin bound to the string it was looked up on.
#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    receiver: String,
    builtin: Builtin,
}

impl Method {
    /// Look up `name` on `receiver`. Only strings carry methods.
    pub fn bind(receiver: &Value, name: &str) -> Option<Self> {
        let receiver = receiver.as_str()?;
        Some(Self {
            receiver: receiver.to_string(),
            builtin: Builtin::from_name(name)?,
        })
    }

    pub fn builtin(&self) -> Builtin {
        self.builtin
    }

    /// Invoke with literal arguments.
    ///
    /// Returns `None` when the arguments do not fit the method.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        let s = self.receiver.as_str();
        let value = match (self.builtin, args) {
            (Builtin::StartsWith, [Value::Str(prefix)]) => Value::Bool(s.starts_with(prefix.as_str())),
            (Builtin::EndsWith, [Value::Str(suffix)]) => Value::Bool(s.ends_with(suffix.as_str())),
            (Builtin::Lower, []) => Value::Str(s.to_lowercase()),
            (Builtin::Upper, []) => Value::Str(s.to_uppercase()),
            (Builtin::Strip, []) => Value::Str(s.trim().to_string()),
            (Builtin::Strip, [Value::Str(set)]) => {
                Value::Str(s.trim_matches(|c: char| set.contains(c)).to_string())
            }
            (Builtin::Find, [Value::Str(needle)]) => Value::Int(
                s.find(needle.as_str())
                    .map_or(-1, |byte| s[..byte].chars().count() as i64),
            ),
            (Builtin::Count, [Value::Str(needle)]) => Value::Int(s.matches(needle.as_str()).count() as i64),
            (Builtin::Replace, [Value::Str(from), Value::Str(to)]) => {
                Value::Str(s.replace(from.as_str(), to))
            }
            (Builtin::Split, []) => Value::List(s.split_whitespace().map(Value::from).collect()),
            (Builtin::Split, [Value::Str(sep)]) if !sep.is_empty() => {
                Value::List(s.split(sep.as_str()).map(Value::from).collect())
            }
            (Builtin::IsDigit, []) => {
                Value::Bool(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
            }
            _ => return None,
        };
        Some(value)
    }
}
