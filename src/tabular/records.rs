//! Array-of-records sheets: a header row of field paths, then one row per
//! record.
//!
//! The column set is derived from the first record only. Fields that appear
//! only in later records have no column and are not exported.

use super::{coerce, parse_field_path, render, SheetData, SheetRow};
use crate::fieldpath::{get, set, Path, PathElement, PathError};
use crate::pattern::Blacklist;
use crate::value::{Map, Value};

/// Builds records from a sheet whose row 0 names the column paths.
///
/// Rows without any non-blank cell are skipped. Empty cells and columns with
/// a blank header are left unset. A header that starts with an index or
/// addresses an index past
/// [`MAX_ARRAY_INDEX`](crate::fieldpath::MAX_ARRAY_INDEX) fails.
pub fn decode(rows: &[SheetRow]) -> Result<Vec<Value>, PathError> {
    let (header, data) = match rows.split_first() {
        Some((header, data)) if !data.is_empty() => (header, data),
        _ => return Ok(Vec::new()),
    };

    let columns = header
        .iter()
        .map(|h| {
            if h.trim().is_empty() {
                Ok(None)
            } else {
                parse_field_path(h).map(Some)
            }
        })
        .collect::<Result<Vec<Option<Path>>, PathError>>()?;

    let mut records = Vec::new();
    for row in data {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut record = Value::Map(Map::new());
        for (column, cell) in columns.iter().zip(row) {
            if let Some(path) = column {
                if !cell.is_empty() {
                    set(&mut record, path, coerce(cell))?;
                }
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// Renders records as a sheet.
///
/// Columns come from [`extract_headers`] on the first record; a column is
/// dropped when `{base_path}[*].{column}` is blacklisted for `target`. Values
/// missing from a record render as empty cells. An empty slice yields a
/// single empty row.
pub fn encode(items: &[Value], target: &str, base_path: &str, blacklist: &Blacklist) -> SheetData {
    let first = match items.first() {
        Some(first) => first,
        None => return vec![Vec::new()],
    };

    let columns: Vec<Path> = extract_headers(first)
        .into_iter()
        .filter(|column| {
            let full = format!("{}[*].{}", base_path, column);
            !blacklist.is_blacklisted(&full, target)
        })
        .collect();

    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(columns.iter().map(Path::to_string).collect());
    for item in items {
        rows.push(
            columns
                .iter()
                .map(|column| get(item, column).map(render).unwrap_or_default())
                .collect(),
        );
    }
    rows
}

/// Flattens a record into column paths.
///
/// Objects expand to `field.sub`; arrays expand to `field[i]`, descending
/// further only into object elements. Empty containers yield no columns, and
/// a record that is not an object yields none at all.
pub fn extract_headers(record: &Value) -> Vec<Path> {
    let mut headers = Vec::new();
    if let Value::Map(map) = record {
        collect_object(map, &mut Path::new(), &mut headers);
    }
    headers
}

fn collect_object(map: &Map, path: &mut Path, headers: &mut Vec<Path>) {
    for (key, value) in map.iter() {
        path.push(PathElement::Key(key.clone()));
        match value {
            Value::Map(child) => collect_object(child, path, headers),
            Value::List(items) => collect_array(items, path, headers),
            _ => headers.push(path.clone()),
        }
        path.pop();
    }
}

fn collect_array(items: &[Value], path: &mut Path, headers: &mut Vec<Path>) {
    for (i, item) in items.iter().enumerate() {
        path.push(PathElement::Index(i));
        match item {
            Value::Map(child) => collect_object(child, path, headers),
            _ => headers.push(path.clone()),
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn sheet(data: &[&[&str]]) -> SheetData {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn json(text: &str) -> Value {
        from_json(text).unwrap()
    }

    #[test]
    fn test_decode_rows_into_records() {
        let rows = sheet(&[
            &["slug", "title", "meta.order", "tags[0]", "tags[1]"],
            &["intro", "Intro", "1", "news", ""],
            &["", "", "", "", ""],
            &["outro", "Outro", "2", "", "misc"],
        ]);
        let records = decode(&rows).unwrap();
        assert_eq!(
            records,
            vec![
                json(r#"{"slug":"intro","title":"Intro","meta":{"order":1},"tags":["news"]}"#),
                json(r#"{"slug":"outro","title":"Outro","meta":{"order":2},"tags":[null,"misc"]}"#),
            ]
        );
    }

    #[test]
    fn test_decode_header_only_is_empty() {
        assert!(decode(&sheet(&[&["a", "b"]])).unwrap().is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_ignores_blank_headers_and_short_rows() {
        let rows = sheet(&[&["a", "", "b"], &["1", "ignored", ""], &["x"]]);
        assert_eq!(
            decode(&rows).unwrap(),
            vec![json(r#"{"a":1}"#), json(r#"{"a":"x"}"#)]
        );
    }

    #[test]
    fn test_decode_malformed_header_fails() {
        let rows = sheet(&[&["a..b"], &["1"]]);
        assert!(decode(&rows).is_err());
    }

    #[test]
    fn test_decode_rejects_index_headers() {
        let rows = sheet(&[&["name", "[0]"], &["a", "x"]]);
        assert!(matches!(decode(&rows), Err(PathError::Malformed { .. })));

        let rows = sheet(&[&["tags[99999999999]"], &["x"]]);
        assert!(matches!(decode(&rows), Err(PathError::Malformed { .. })));
    }

    #[test]
    fn test_extract_headers() {
        let record = json(
            r#"{"id":1,"image":{"src":"a.png","alt":"A"},"tags":["x","y"],"links":[{"href":"/a"}],"empty":{}}"#,
        );
        let headers: Vec<String> = extract_headers(&record).iter().map(Path::to_string).collect();
        assert_eq!(
            headers,
            vec!["id", "image.src", "image.alt", "tags[0]", "tags[1]", "links[0].href"]
        );
        assert!(extract_headers(&json("[1,2]")).is_empty());
    }

    #[test]
    fn test_encode_uses_first_record_shape() {
        let items = vec![
            json(r#"{"title":"A","meta":{"order":1}}"#),
            json(r#"{"title":"B","extra":"dropped"}"#),
        ];
        let rows = encode(&items, "posts", "content.posts", &Blacklist::new());
        assert_eq!(
            rows,
            sheet(&[&["title", "meta.order"], &["A", "1"], &["B", ""]])
        );
    }

    #[test]
    fn test_encode_omits_blacklisted_columns() {
        let items = vec![json(r#"{"id":7,"title":"A","image":{"src":"a.png"}}"#)];
        let blacklist = Blacklist::new()
            .with("*", "**.id")
            .unwrap()
            .with("collections", "content.collections[*].image")
            .unwrap();
        let rows = encode(&items, "collections", "content.collections", &blacklist);
        assert_eq!(rows, sheet(&[&["title"], &["A"]]));
    }

    #[test]
    fn test_encode_empty_items() {
        let rows = encode(&[], "t", "list", &Blacklist::new());
        assert_eq!(rows, vec![Vec::<String>::new()]);
    }
}
