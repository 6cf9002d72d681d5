//! Key-value sheets: a fixed header row, then one `(path, value)` row per leaf.

use super::{coerce, parse_field_path, render, SheetData, SheetRow};
use crate::fieldpath::{set, Path, PathElement, PathError};
use crate::pattern::Blacklist;
use crate::value::{Map, Value};

/// Header row written by [`encode`].
pub const HEADER: [&str; 2] = ["Key Path", "Value"];

/// Builds a tree from key-value rows.
///
/// Row 0 is the header and is skipped, as are rows whose key is empty or
/// starts with `#`. A missing value cell reads as an empty string. When a
/// path repeats, the later row wins. Keys that start with an index or pad an
/// array past [`MAX_ARRAY_INDEX`](crate::fieldpath::MAX_ARRAY_INDEX) fail.
pub fn decode(rows: &[SheetRow]) -> Result<Value, PathError> {
    let mut tree = Value::Map(Map::new());
    for row in rows.iter().skip(1) {
        let key = match row.first() {
            Some(key) if !key.is_empty() && !key.starts_with('#') => key,
            _ => continue,
        };
        let cell = row.get(1).map(String::as_str).unwrap_or("");
        set(&mut tree, &parse_field_path(key)?, coerce(cell))?;
    }
    Ok(tree)
}

/// Flattens a tree into key-value rows, leaving out blacklisted subtrees.
///
/// Rows follow a depth-first walk in object key order and array index order.
/// Empty arrays and objects produce no rows.
pub fn encode(tree: &Value, target: &str, blacklist: &Blacklist) -> SheetData {
    let mut flattener = Flattener {
        target,
        blacklist,
        rows: vec![HEADER.iter().map(|h| h.to_string()).collect()],
    };
    flattener.visit(tree, &mut Path::new());
    flattener.rows
}

struct Flattener<'a> {
    target: &'a str,
    blacklist: &'a Blacklist,
    rows: SheetData,
}

impl Flattener<'_> {
    fn visit(&mut self, value: &Value, path: &mut Path) {
        if !path.is_empty() {
            let text = path.to_string();
            if self.blacklist.is_blacklisted(&text, self.target) {
                return;
            }
            if value.is_leaf() {
                self.rows.push(vec![text, render(value)]);
                return;
            }
        }

        match value {
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(PathElement::Index(i));
                    self.visit(item, path);
                    path.pop();
                }
            }
            Value::Map(map) => {
                for (key, child) in map.iter() {
                    path.push(PathElement::Key(key.clone()));
                    self.visit(child, path);
                    path.pop();
                }
            }
            // A scalar root has no path to address it by.
            _ => {}
        }
    }
}
