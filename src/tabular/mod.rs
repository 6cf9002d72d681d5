//! Tabular module - Converts between document trees and spreadsheet rows.
//!
//! Two codecs are provided:
//!
//! - [`keyvalue`]: one row per leaf, `(path, value)`.
//! - [`records`]: one row per element of an array of objects, one column per
//!   flattened field path.
//!
//! Cells are untyped strings. Decoding infers types with [`coerce`]; encoding
//! renders leaves with [`render`].

pub mod keyvalue;
pub mod records;


use crate::fieldpath::{parse_path, Path, PathElement, PathError};
use crate::value::Value;

/// One spreadsheet row.
pub type SheetRow = Vec<String>;

/// A whole sheet, row 0 first.
pub type SheetData = Vec<SheetRow>;

/// Infers a typed value from a cell.
///
/// - `""` stays an empty string.
/// - `true` / `false` become booleans, `null` becomes null.
/// - text that is entirely a finite decimal number (surrounding whitespace
///   allowed) becomes a number, an integer when it fits in `i64`.
/// - anything else is kept verbatim.
pub fn coerce(cell: &str) -> Value {
    match cell {
        "" => Value::String(String::new()),
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => parse_number(cell).unwrap_or_else(|| Value::String(cell.to_string())),
    }
}

fn parse_number(cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    let numeric = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::Int(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

/// Renders a value as cell text.
///
/// Null renders as `null` so it survives a round trip; arrays and objects
/// render as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::List(_) | Value::Map(_) => value.to_string(),
    }
}

/// Parses a key cell or column header. Sheet rows always address fields of
/// an object, so a path that starts with an index is rejected.
fn parse_field_path(text: &str) -> Result<Path, PathError> {
    let path = parse_path(text)?;
    let starts_with_index = matches!(path.iter().next(), Some(PathElement::Index(_)));
    if starts_with_index {
        Err(PathError::malformed(text, "path must start with a key"))
    } else {
        Ok(path)
    }
}
