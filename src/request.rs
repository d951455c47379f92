//! Request-derived selection hints.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{EXCEPT_DATA_HEADER, ONLY_DATA_HEADER, PARTIAL_COMPONENT_HEADER};

/// The headers of the request being answered.
///
/// Header names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct PartialRequest {
    headers: HashMap<String, String>,
}

impl PartialRequest {
    /// A request without any headers (a full load).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` header pairs. Later duplicates win.
    pub fn from_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self { headers }
    }

    /// Set a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Mark the request as a partial reload of `component`.
    pub fn with_partial_component(self, component: &str) -> Self {
        self.with_header(PARTIAL_COMPONENT_HEADER, component)
    }

    /// Ask for only the given dot-paths.
    pub fn with_only<S: AsRef<str>>(self, paths: &[S]) -> Self {
        self.with_header(ONLY_DATA_HEADER, encode_paths(paths))
    }

    /// Ask for everything except the given dot-paths.
    pub fn with_except<S: AsRef<str>>(self, paths: &[S]) -> Self {
        self.with_header(EXCEPT_DATA_HEADER, encode_paths(paths))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    /// Component targeted by a partial reload, if any.
    pub fn partial_component(&self) -> Option<&str> {
        self.header(PARTIAL_COMPONENT_HEADER)
    }

    /// Paths requested via the only-data header.
    ///
    /// `None` when the header is absent; malformed payloads yield an empty list.
    pub fn only_data(&self) -> Option<Vec<String>> {
        self.header(ONLY_DATA_HEADER).map(parse_paths)
    }

    /// Paths excluded via the except-data header.
    pub fn except_data(&self) -> Option<Vec<String>> {
        self.header(EXCEPT_DATA_HEADER).map(parse_paths)
    }
}

/// Decode a JSON-encoded path list, dropping falsy entries.
///
/// Arrays yield their entries, objects their values; anything else, including
/// invalid JSON, yields nothing.
pub fn parse_paths(raw: &str) -> Vec<String> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        _ => return Vec::new(),
    };

    items.into_iter().filter_map(path_entry).collect()
}

fn path_entry(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() && s != "0" => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn encode_paths<S: AsRef<str>>(paths: &[S]) -> String {
    let list: Vec<&str> = paths.iter().map(AsRef::as_ref).collect();
    Value::from(list).to_string()
}
