//! Dot-path selection over property mappings.
//!
//! `"user.name"` addresses `{ "user": { "name": ... } }`. Paths walk through
//! nested [`Properties`] and literal JSON objects. A key that literally
//! contains the full dotted path always wins over walking.

use serde_json::{Map, Value};

use crate::property::{Properties, Property};

/// Keep only the entries reachable by `paths`.
///
/// The result is a fresh mapping with intermediate mappings created as
/// needed. Paths that do not resolve are skipped, and nothing is created
/// for them.
pub fn only_dot<S: AsRef<str>>(properties: Properties, paths: &[S]) -> Properties {
    let mut source = properties;
    let mut result = Properties::new();

    for path in paths {
        let path = path.as_ref();
        if let Some(value) = source.remove(path) {
            merge_into(&mut result, path, value);
        } else if let Some(value) = take_dot(&mut source, path) {
            set_dot(&mut result, path, value);
        }
    }

    result
}

/// Remove every entry reachable by `paths`.
pub fn except_dot<S: AsRef<str>>(properties: Properties, paths: &[S]) -> Properties {
    let mut properties = properties;
    for path in paths {
        let path = path.as_ref();
        if properties.remove(path).is_none() {
            take_dot(&mut properties, path);
        }
    }
    properties
}

/// Write `value` into a resolved object at `path`.
///
/// Non-object intermediates are replaced with objects; an existing leaf is
/// overwritten.
pub fn set_value_dot(map: &mut Map<String, Value>, path: &str, value: Value) {
    let (head, rest) = match path.split_once('.') {
        Some(split) => split,
        None => {
            map.insert(path.to_string(), value);
            return;
        }
    };

    let child = map
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(inner) = child {
        set_value_dot(inner, rest, value);
    }
}

/// Detach the value at a nested `path`, leaving the rest of the tree intact.
///
/// Only mappings and JSON objects are walked; numeric segments do not index
/// into lists.
fn take_dot(map: &mut Properties, path: &str) -> Option<Property> {
    let Some((head, rest)) = path.split_once('.') else {
        return map.remove(path);
    };

    match map.get_mut(head)? {
        Property::Map(inner) => {
            if let Some(value) = inner.remove(rest) {
                return Some(value);
            }
            take_dot(inner, rest)
        }
        Property::Value(Value::Object(inner)) => take_value_dot(inner, rest).map(Property::Value),
        _ => None,
    }
}

fn take_value_dot(map: &mut Map<String, Value>, path: &str) -> Option<Value> {
    if let Some(value) = map.shift_remove(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    match map.get_mut(head)? {
        Value::Object(inner) => take_value_dot(inner, rest),
        _ => None,
    }
}

/// Place `value` at `path`, creating intermediate mappings.
fn set_dot(map: &mut Properties, path: &str, value: Property) {
    let Some((head, rest)) = path.split_once('.') else {
        merge_into(map, path, value);
        return;
    };

    let placeholder = Property::Value(Value::Null);
    let mut inner = match map.get_mut(head).map(|slot| std::mem::replace(slot, placeholder)) {
        Some(Property::Map(inner)) => inner,
        Some(Property::Value(Value::Object(obj))) => obj.into_iter().collect(),
        _ => Properties::new(),
    };
    set_dot(&mut inner, rest, value);
    map.insert(head, inner);
}

/// Insert `value` under `key`, merging with a mapping already selected there.
///
/// This covers selecting an ancestor after one of its descendants.
fn merge_into(map: &mut Properties, key: &str, value: Property) {
    let value = match value {
        Property::Value(Value::Object(obj)) if matches!(map.get(key), Some(Property::Map(_))) => {
            Property::from(obj)
        }
        other => other,
    };

    match (map.get_mut(key), value) {
        (Some(Property::Map(existing)), Property::Map(incoming)) => {
            for (k, v) in incoming {
                merge_into(existing, &k, v);
            }
        }
        (_, value) => {
            map.insert(key, value);
        }
    }
}
