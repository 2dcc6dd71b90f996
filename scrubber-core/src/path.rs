//! Dotted attribute-path access over `serde_json::Value` trees.
//!
//! An attribute path such as `"user.address.city"` or `"users.0.name"` is split on
//! `.`; each segment selects a key of a mapping or, when numeric, an index of a
//! sequence. A top-level key that itself contains dots (`"meta.version"`) is
//! matched literally before the path is split.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

/// Separator between the segments of an attribute path.
pub const PATH_SEPARATOR: char = '.';

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn literal_key<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    match data {
        Value::Object(map) if path.contains(PATH_SEPARATOR) => map.get(path),
        _ => None,
    }
}

/// Returns a reference to the value at `path`, if the whole path exists.
///
/// A present `null` counts as existing.
pub fn get<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    if let Some(value) = literal_key(data, path) {
        return Some(value);
    }
    path.split(PATH_SEPARATOR)
        .try_fold(data, |node, segment| child(node, segment))
}

/// Returns `true` if every segment of `path` exists in `data`.
pub fn has(data: &Value, path: &str) -> bool {
    get(data, path).is_some()
}

/// Writes `value` at `path`, creating intermediate mappings where they are missing.
///
/// Scalars found on the way are replaced by mappings. A numeric segment indexes an
/// existing sequence, and an index equal to its length appends. Returns `false`
/// (leaving `data` untouched) when a segment cannot address a sequence.
pub fn set(data: &mut Value, path: &str, value: Value) -> bool {
    if path.is_empty() {
        return false;
    }
    if let Value::Object(map) = data {
        if path.contains(PATH_SEPARATOR) && map.contains_key(path) {
            map.insert(path.to_string(), value);
            return true;
        }
    }

    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if !addressable(data, &segments) {
        return false;
    }

    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return false,
    };

    let mut node = data;
    for segment in parents {
        node = match descend_or_create(node, segment) {
            Some(next) => next,
            None => return false,
        };
    }
    assign(node, last, value)
}

/// Checks, without mutating anything, that every sequence met along `segments`
/// is addressed by a usable index.
fn addressable(data: &Value, segments: &[&str]) -> bool {
    let mut node = Some(data);
    for segment in segments {
        match node {
            Some(Value::Array(items)) => match segment.parse::<usize>() {
                Ok(index) if index <= items.len() => node = items.get(index),
                _ => return false,
            },
            Some(current) => node = child(current, segment),
            None => return true,
        }
    }
    true
}

fn descend_or_create<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    if !node.is_object() && !node.is_array() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => Some(
            map.entry(segment.to_string())
                .and_modify(|existing| {
                    if !existing.is_object() && !existing.is_array() {
                        *existing = Value::Object(Map::new());
                    }
                })
                .or_insert_with(|| Value::Object(Map::new())),
        ),
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok()?;
            if index == items.len() {
                items.push(Value::Object(Map::new()));
            }
            let next = items.get_mut(index)?;
            if !next.is_object() && !next.is_array() {
                *next = Value::Object(Map::new());
            }
            Some(next)
        }
        _ => None,
    }
}

fn assign(node: &mut Value, segment: &str, value: Value) -> bool {
    if !node.is_object() && !node.is_array() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            true
        }
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) if index < items.len() => {
                items[index] = value;
                true
            }
            Ok(index) if index == items.len() => {
                items.push(value);
                true
            }
            _ => false,
        },
        _ => false,
    }
}
