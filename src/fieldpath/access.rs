//! Reading and writing tree nodes by path.

use super::path::{parse_path, Path, PathElement, PathError};
use crate::value::{Map, Value};

/// Largest array index `set` will pad up to.
pub const MAX_ARRAY_INDEX: usize = 10_000;

/// Returns the node at `path`, or `None` when any step is missing or lands on
/// a node that cannot be indexed that way.
pub fn get<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    path.iter()
        .try_fold(tree, |current, element| match (element, current) {
            (PathElement::Key(key), Value::Map(map)) => map.get(key),
            (PathElement::Index(idx), Value::List(items)) => items.get(*idx),
            _ => None,
        })
}

/// Parses `path` and returns the node it addresses.
pub fn get_str<'a>(tree: &'a Value, path: &str) -> Result<Option<&'a Value>, PathError> {
    Ok(get(tree, &parse_path(path)?))
}

/// Assigns `value` at `path`, creating containers along the way.
///
/// A missing intermediate becomes an array when the following element is an
/// index and an object otherwise. An intermediate of the wrong container kind
/// is replaced. Assigning past the end of an array pads it with nulls.
///
/// Fails without touching `tree` when an index exceeds [`MAX_ARRAY_INDEX`].
pub fn set(tree: &mut Value, path: &Path, value: Value) -> Result<(), PathError> {
    if let Some(idx) = path.iter().find_map(|element| match element {
        PathElement::Index(idx) if *idx > MAX_ARRAY_INDEX => Some(*idx),
        _ => None,
    }) {
        return Err(PathError::malformed(
            path.to_string(),
            format!("index {} exceeds the limit of {}", idx, MAX_ARRAY_INDEX),
        ));
    }

    let mut current = tree;
    for element in path.iter() {
        current = child_slot(current, element);
    }
    *current = value;
    Ok(())
}

/// Parses `path` and assigns `value` there.
pub fn set_str(tree: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    set(tree, &parse_path(path)?, value)
}

/// Places `array` at a dotted (bracket-free) path, creating only objects on
/// the way down.
pub fn set_array_at_path(tree: &mut Value, dotted: &str, array: Vec<Value>) -> Result<(), PathError> {
    let keys: Vec<&str> = dotted.split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        return Err(PathError::malformed(dotted, "empty segment"));
    }
    if dotted.contains(['[', ']']) {
        return Err(PathError::malformed(dotted, "array base path must be dotted"));
    }

    let mut current = tree;
    for key in keys {
        current = ensure_map(current).entry(key);
    }
    *current = Value::List(array);
    Ok(())
}

fn child_slot<'a>(parent: &'a mut Value, element: &PathElement) -> &'a mut Value {
    match element {
        PathElement::Key(key) => ensure_map(parent).entry(key),
        PathElement::Index(idx) => {
            let items = ensure_list(parent);
            if *idx >= items.len() {
                items.resize(idx + 1, Value::Null);
            }
            &mut items[*idx]
        }
    }
}

fn ensure_map(value: &mut Value) -> &mut Map {
    if !value.is_map() {
        *value = Value::Map(Map::new());
    }
    match value {
        Value::Map(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

fn ensure_list(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_list() {
        *value = Value::List(Vec::new());
    }
    match value {
        Value::List(items) => items,
        _ => unreachable!("value was just replaced with an array"),
    }
}
