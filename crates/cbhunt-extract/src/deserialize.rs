//! Tolerant recovery of JSON from free-form model text.
//!
//! Models wrap JSON in fences, prose, comments and trailing commas. Recovery
//! runs in order: strip fences, cut the outermost balanced span, parse, and
//! only if that fails apply string-aware repairs and parse again. A list
//! payload that cannot be recovered becomes `[]`; an object payload that
//! cannot be recovered is an error.

use serde_json::Value;

use crate::error::ExtractError;
use crate::schema::PayloadKind;

/// Recovers the JSON payload of `raw` for a shape expecting `kind`.
///
/// # Errors
///
/// Returns [`ExtractError::MalformedOutput`] when `kind` is
/// [`PayloadKind::Object`] and no object can be recovered. List payloads
/// never error; they degrade to an empty array.
pub fn parse_payload(raw: &str, kind: PayloadKind) -> Result<Value, ExtractError> {
    let unfenced = strip_code_fences(raw);
    let span = outermost_span(unfenced).or_else(|| outermost_span(raw));

    let Some(span) = span else {
        return give_up(kind, "no JSON array or object found");
    };

    let value = match serde_json::from_str::<Value>(span) {
        Ok(value) => value,
        Err(first_err) => match serde_json::from_str::<Value>(&repair(span)) {
            Ok(value) => {
                tracing::debug!(error = %first_err, "model output parsed after repair");
                value
            }
            Err(err) => return give_up(kind, &err.to_string()),
        },
    };

    Ok(coerce(value, kind))
}

fn give_up(kind: PayloadKind, reason: &str) -> Result<Value, ExtractError> {
    match kind {
        PayloadKind::List => {
            tracing::warn!(reason, "unrecoverable list output, treating as empty");
            Ok(Value::Array(Vec::new()))
        }
        PayloadKind::Object => Err(ExtractError::MalformedOutput {
            reason: reason.to_string(),
        }),
    }
}

/// A lone object where a list was expected is a one-element list, and a
/// one-element list where an object was expected is that object.
fn coerce(value: Value, kind: PayloadKind) -> Value {
    match (kind, value) {
        (PayloadKind::List, obj @ Value::Object(_)) => Value::Array(vec![obj]),
        (PayloadKind::Object, Value::Array(mut items))
            if items.len() == 1 && items[0].is_object() =>
        {
            items.remove(0)
        }
        (_, value) => value,
    }
}

/// Returns the body of the first fenced block, or the trimmed input if it
/// has no fence.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let tag_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let body = &after[tag_len..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Finds the first `[` or `{` and returns the span up to its balanced
/// closer. Brackets inside string literals are ignored. An unbalanced span
/// falls back to the last matching closer in the text.
fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let close = if text[start..].starts_with('[') { ']' } else { '}' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    match text.rfind(close) {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

fn repair(span: &str) -> String {
    let without_comments = strip_comments(span);
    let with_commas = insert_missing_commas(&without_comments);
    let without_trailing = strip_trailing_commas(&with_commas);
    collapse_control_chars(&without_trailing)
}

/// Tracks whether the scanner is inside a JSON string literal.
#[derive(Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Advances over `c`. Returns `true` if `c` lies outside any string
    /// literal (opening quotes count as outside).
    fn step(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            false
        } else {
            if c == '"' {
                self.in_string = true;
            }
            true
        }
    }
}

fn strip_comments(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut state = StringState::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        if !state.in_string && c == '/' && next == Some('/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if !state.in_string && c == '/' && next == Some('*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            i = (i + 2).min(chars.len());
            continue;
        }
        state.step(c);
        out.push(c);
        i += 1;
    }
    out
}

/// `} {` becomes `}, {` outside strings.
fn insert_missing_commas(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut state = StringState::default();
    let mut last_significant = None;

    for c in src.chars() {
        let outside = state.step(c);
        if outside && c == '{' && last_significant == Some('}') {
            out.push(',');
        }
        out.push(c);
        if !c.is_whitespace() {
            last_significant = Some(c);
        }
    }
    out
}

fn strip_trailing_commas(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut state = StringState::default();

    for (i, &c) in chars.iter().enumerate() {
        let outside = state.step(c);
        if outside && c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some(']' | '}')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Raw control characters are invalid inside JSON strings; replace them
/// with spaces everywhere.
fn collapse_control_chars(src: &str) -> String {
    src.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_array_parses() {
        let value = parse_payload(r#"[{"a":1}]"#, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn fenced_json_with_prose_parses() {
        let raw = "Here you go:\n```json\n[{\"a\": \"x\"}]\n```\nHope this helps!";
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"a": "x"}]));
    }

    #[test]
    fn prose_around_unfenced_object() {
        let raw = "Result: {\"name\": \"Labubu\", \"tags\": [\"a\"]} -- end";
        let value = parse_payload(raw, PayloadKind::Object).unwrap();
        assert_eq!(value, json!({"name": "Labubu", "tags": ["a"]}));
    }

    #[test]
    fn brackets_inside_strings_do_not_end_the_span() {
        let raw = r#"[{"title": "用 ] 和 } 做标题"}] trailing ]"#;
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"title": "用 ] 和 } 做标题"}]));
    }

    #[test]
    fn trailing_commas_are_removed() {
        let raw = r#"[{"a": 1, "b": [1, 2,],},]"#;
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"a": 1, "b": [1, 2]}]));
    }

    #[test]
    fn missing_comma_between_objects_is_inserted() {
        let raw = "[{\"a\": 1}\n{\"a\": 2}]";
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"a": 1}, {"a": 2}]));
    }

    #[test]
    fn comments_are_stripped_but_urls_survive() {
        let raw = "[\n// first\n{\"url\": \"https://example.com/x\" /* note */}\n]";
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"url": "https://example.com/x"}]));
    }

    #[test]
    fn raw_newline_inside_string_is_collapsed() {
        let raw = "{\"insight\": \"line one\nline two\"}";
        let value = parse_payload(raw, PayloadKind::Object).unwrap();
        assert_eq!(value, json!({"insight": "line one line two"}));
    }

    #[test]
    fn lone_object_becomes_one_element_list() {
        let value = parse_payload(r#"{"a": 1}"#, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn single_element_list_unwraps_for_object() {
        let value = parse_payload(r#"[{"a": 1}]"#, PayloadKind::Object).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn garbage_list_degrades_to_empty() {
        let value = parse_payload("I could not find anything.", PayloadKind::List).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn garbage_object_is_an_error() {
        let err = parse_payload("sorry, no data", PayloadKind::Object).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedOutput { .. }));
    }

    #[test]
    fn truncated_list_degrades_to_empty() {
        let value = parse_payload(r#"[{"a": 1}, {"a": "#, PayloadKind::List).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn empty_text_degrades_to_empty_list() {
        assert_eq!(parse_payload("", PayloadKind::List).unwrap(), json!([]));
    }

    #[test]
    fn cjk_text_survives_repair() {
        let raw = "```\n[{\"品牌\": \"喜茶\",}]\n```";
        let value = parse_payload(raw, PayloadKind::List).unwrap();
        assert_eq!(value, json!([{"品牌": "喜茶"}]));
    }
}
