//! Document loading from various sources.
//!
//! Handles loading property documents and resolver configuration from files,
//! strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::property::{Lazy, Properties, Property};
use crate::types::{json_type_name, ResolverConfig};

#[cfg(feature = "remote")]
use std::time::Duration;

/// Marker key turning an object into a lazy property.
pub const LAZY_MARKER: &str = "$lazy";

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the body
/// isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a JSON document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_json_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_json(Path::new(source))
    }
}

/// Build properties from a JSON document.
///
/// Objects become nested mappings and arrays become property lists. An
/// object whose only key is `"$lazy"` becomes a lazy property producing its
/// inner value.
///
/// # Errors
///
/// Returns `LoadError::NotAnObject` if the top level isn't an object.
pub fn properties_from_value(value: Value) -> Result<Properties, LoadError> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, property_from_value(value)))
            .collect()),
        other => Err(LoadError::NotAnObject {
            actual: json_type_name(&other).to_string(),
        }),
    }
}

/// Load properties from a file path or URL.
pub fn load_properties(source: &str) -> Result<Properties, LoadError> {
    properties_from_value(load_json_auto(source)?)
}

/// Load resolver configuration from a JSON file.
///
/// # Errors
///
/// Returns `LoadError::InvalidConfig` if the document doesn't describe a
/// configuration.
pub fn load_config(path: &Path) -> Result<ResolverConfig, LoadError> {
    let value = load_json(path)?;
    serde_json::from_value(value).map_err(|source| LoadError::InvalidConfig { source })
}

fn property_from_value(value: Value) -> Property {
    match value {
        Value::Object(map) if map.len() == 1 && map.contains_key(LAZY_MARKER) => {
            let inner = map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null);
            let inner = property_from_value(inner);
            Property::Lazy(Lazy::new(move || inner))
        }
        Value::Object(map) => Property::Map(
            map.into_iter()
                .map(|(key, value)| (key, property_from_value(value)))
                .collect(),
        ),
        Value::Array(items) => Property::List(items.into_iter().map(property_from_value).collect()),
        other => Property::Value(other),
    }
}
