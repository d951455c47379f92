//! Key case conversion.
//!
//! Both conversions are idempotent: converting an already converted key
//! returns it unchanged.

use serde_json::{Map, Value};

use crate::types::Case;

/// Renames the keys of a resolved mapping.
pub trait CaseConverter {
    /// Convert every key of `map` to `case`, recursing through nested
    /// objects and arrays.
    fn convert(&self, map: Map<String, Value>, case: Case) -> Map<String, Value>;
}

/// Default converter using [`to_camel`] and [`to_snake`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyCaseConverter;

impl CaseConverter for KeyCaseConverter {
    fn convert(&self, map: Map<String, Value>, case: Case) -> Map<String, Value> {
        if case == Case::None {
            return map;
        }
        convert_map(map, case)
    }
}

impl Case {
    /// Apply this case to a single key.
    pub fn apply(self, key: &str) -> String {
        match self {
            Case::None => key.to_string(),
            Case::Camel => to_camel(key),
            Case::Snake => to_snake(key),
        }
    }

    /// Apply this case to every segment of a dot-path.
    pub fn apply_path(self, path: &str) -> String {
        match self {
            Case::None => path.to_string(),
            _ => path
                .split('.')
                .map(|segment| self.apply(segment))
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

/// Convert a key to lowerCamelCase.
///
/// `_`, `-` and whitespace separate words; the first word gets a lowercase
/// initial, the rest an uppercase initial. Other characters are kept.
pub fn to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for word in key
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert a key to snake_case.
///
/// Words separated by whitespace are joined, and an underscore is inserted
/// before each uppercase ASCII letter that doesn't start the key. Existing
/// `_` and `-` are kept, so `_id` and `id` stay distinct.
pub fn to_snake(key: &str) -> String {
    if !key.chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    let mut word_start = true;
    for c in key.chars() {
        if c.is_whitespace() {
            word_start = true;
            continue;
        }
        let boundary = c.is_ascii_uppercase() || (word_start && c.is_ascii_lowercase());
        if boundary && !out.is_empty() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        word_start = false;
    }
    out
}

fn convert_map(map: Map<String, Value>, case: Case) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (case.apply(&key), convert_value(value, case)))
        .collect()
}

/// Convert the keys of any JSON value, recursing through objects and arrays.
pub fn convert_value(value: Value, case: Case) -> Value {
    match value {
        Value::Object(map) => Value::Object(convert_map(map, case)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert_value(item, case))
                .collect(),
        ),
        other => other,
    }
}
