//! Evaluation of call-argument segments such as `('Sarah', 2)`.
//!
//! Only literals are accepted: quoted strings (with `\\`, `\'`, `\"`, `\n`,
//! `\t` escapes), integers, floats, `True`, `False` and `None`. A trailing
//! comma is allowed.

use std::iter::Peekable;
use std::str::Chars;

use gramps_types::Value;

use crate::error::{StructError, StructResult};

/// Evaluate an arguments segment into its literal values.
pub fn parse_arguments(segment: &str) -> StructResult<Vec<Value>> {
    let invalid = |reason: &str| StructError::InvalidArguments {
        segment: segment.to_string(),
        reason: reason.to_string(),
    };

    let inner = segment
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| invalid("expected a parenthesized argument list"))?;

    let mut chars = inner.chars().peekable();
    let mut args = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
            break;
        }
        args.push(parse_literal(&mut chars).map_err(|reason| invalid(&reason))?);
        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(invalid(&format!("unexpected character {c:?}"))),
        }
    }
    Ok(args)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_literal(chars: &mut Peekable<Chars<'_>>) -> Result<Value, String> {
    match chars.peek().copied() {
        Some(quote @ ('\'' | '"')) => {
            chars.next();
            parse_string(chars, quote).map(Value::Str)
        }
        Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => parse_number(chars),
        Some(c) if c.is_alphabetic() => {
            let mut word = String::new();
            while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
                word.push(c);
            }
            match word.as_str() {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                "None" => Ok(Value::Null),
                other => Err(format!("unsupported name {other:?}")),
            }
        }
        Some(c) => Err(format!("unexpected character {c:?}")),
        None => Err("unexpected end of arguments".into()),
    }
}

fn parse_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(e @ ('\\' | '\'' | '"')) => out.push(e),
                Some(e) => {
                    out.push('\\');
                    out.push(e);
                }
                None => break,
            },
            c if c == quote => return Ok(out),
            c => out.push(c),
        }
    }
    Err("unterminated string literal".into())
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Result<Value, String> {
    let mut text = String::new();
    while let Some(c) =
        chars.next_if(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_'))
    {
        if c != '_' {
            text.push(c);
        }
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("invalid number {text:?}"))
}
