//! Path expression tokenizer.
//!
//! A path is a `.`-separated list of segments addressing a field inside a
//! struct, e.g. `primary_name.surname_list.0.surname`. Two constructs
//! suspend the `.` delimiter:
//!
//! - a quoted literal (`'...'` or `"..."`), kept with its quotes; parentheses
//!   inside it are plain characters
//! - a call-arguments region `(...)`, emitted verbatim as its own segment
//!
//! `primary.first_name.startswith('Sarah')` therefore parses to
//! `["primary", "first_name", "startswith", "('Sarah')"]`.
//!
//! Unterminated quotes or parentheses are not errors: the scanner keeps
//! accumulating and emits whatever it collected at end of input.

/// Split a path expression into segments.
pub fn parse(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut current = String::new();

    for c in path.chars() {
        let in_args = stack.last() == Some(&'(');
        let in_quote = matches!(stack.last(), Some('\'' | '"'));
        match c {
            '(' if stack.is_empty() => {
                emit(&mut segments, &mut current);
                stack.push('(');
                current.push(c);
            }
            ')' if !in_quote => {
                if in_args {
                    stack.pop();
                }
                current.push(c);
                emit(&mut segments, &mut current);
            }
            '\'' | '"' if !in_args => {
                if stack.last() == Some(&c) {
                    stack.pop();
                } else if stack.is_empty() {
                    stack.push(c);
                }
                current.push(c);
            }
            '.' if stack.is_empty() => emit(&mut segments, &mut current),
            _ => current.push(c),
        }
    }
    emit(&mut segments, &mut current);
    segments
}

fn emit(segments: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

/// Returns `true` if the segment is a captured call-arguments region.
pub fn is_arguments(segment: &str) -> bool {
    segment.starts_with('(')
}

/// Strip one pair of matching surrounding quotes, if present.
///
/// Quoted segments address mapping keys that contain `.`, e.g.
/// `attributes.'vital.status'`.
pub fn unquote(segment: &str) -> &str {
    let bytes = segment.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &segment[1..segment.len() - 1];
        }
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_dotted_path() {
        assert_eq!(
            parse("primary_name.surname_list.0.surname"),
            vec!["primary_name", "surname_list", "0", "surname"]
        );
    }

    #[test]
    fn method_call_suffix() {
        assert_eq!(
            parse("primary.first_name.startswith('Sarah')"),
            vec!["primary", "first_name", "startswith", "('Sarah')"]
        );
    }

    #[test]
    fn dot_inside_arguments_does_not_split() {
        assert_eq!(parse("a.b('x.y').c"), vec!["a", "b", "('x.y')", "c"]);
    }

    #[test]
    fn dot_inside_quotes_does_not_split() {
        assert_eq!(parse("attributes.'vital.status'.value"), vec!["attributes", "'vital.status'", "value"]);
        assert_eq!(parse(r#"a."b.c""#), vec!["a", r#""b.c""#]);
    }

    #[test]
    fn other_quote_inside_quotes_is_literal() {
        assert_eq!(parse(r#"a."it's.here".b"#), vec!["a", r#""it's.here""#, "b"]);
    }

    #[test]
    fn parentheses_inside_quotes_are_literal() {
        assert_eq!(parse("a.'b (c)'.d"), vec!["a", "'b (c)'", "d"]);
        assert_eq!(parse("attributes.'born (approx)'"), vec!["attributes", "'born (approx)'"]);
        assert_eq!(parse(r#"a."x)y".b"#), vec!["a", r#""x)y""#, "b"]);
    }

    #[test]
    fn multiple_arguments_kept_verbatim() {
        assert_eq!(
            parse("title.replace('a', \"b\")"),
            vec!["title", "replace", "('a', \"b\")"]
        );
    }

    #[test]
    fn empty_arguments() {
        assert_eq!(parse("name.lower()"), vec!["name", "lower", "()"]);
    }

    #[test]
    fn empty_input_and_empty_segments() {
        assert!(parse("").is_empty());
        assert_eq!(parse("a..b."), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_quote_collects_to_end() {
        assert_eq!(parse("a.'b.c"), vec!["a", "'b.c"]);
    }

    #[test]
    fn unterminated_paren_collects_to_end() {
        assert_eq!(parse("a.f('x.y"), vec!["a", "f", "('x.y"]);
    }

    #[test]
    fn unquote_strips_matching_quotes_only() {
        assert_eq!(unquote("'a.b'"), "a.b");
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("'a\""), "'a\"");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn arguments_detection() {
        assert!(is_arguments("('x')"));
        assert!(!is_arguments("x"));
    }

    proptest! {
        #[test]
        fn identifier_paths_split_on_dots(parts in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..6)) {
            let path = parts.join(".");
            prop_assert_eq!(parse(&path), parts);
        }
    }
}
