//! "Pick the first usable candidate" field resolution.
//!
//! Product records arrive with inconsistent field names and nesting, so
//! every speculative field access in the engine funnels through this
//! module: an ordered candidate list is searched for the first value that
//! yields non-empty text, descending into arrays and known object
//! sub-fields along the way.

use serde_json::Value;

/// Object sub-fields consulted, in order, when a candidate is an object.
const OBJECT_TEXT_FIELDS: &[&str] = &["value", "label", "name", "title", "text", "description"];

/// Return the first usable candidate as trimmed text, or `""` if none.
///
/// Usable means: a non-empty string (after trimming), a finite number, or
/// an array/object that recursively contains one of those. Nulls,
/// booleans and empty containers are skipped.
pub fn pick_text<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    for candidate in candidates.into_iter().flatten() {
        if let Some(text) = usable_text(candidate) {
            return text;
        }
    }
    String::new()
}

/// Extract usable text from a single value, recursing per the candidate
/// rules. `None` means "skip to the next candidate".
pub fn usable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            // serde_json numbers are finite by construction; Display gives
            // the shortest representation ("5", "12.5").
            if n.as_f64().is_some_and(f64::is_finite) {
                Some(n.to_string())
            } else {
                None
            }
        }
        Value::Array(items) => items.iter().find_map(usable_text),
        Value::Object(map) => OBJECT_TEXT_FIELDS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(usable_text),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Speculative dotted-path access into a record, e.g. `field(r, "seo.title")`.
pub fn field<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}
