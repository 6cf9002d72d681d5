//! Tests for blacklist-aware merge and diff.

#[cfg(test)]
mod tests {
    use crate::fieldpath::parse_path;
    use crate::merge::{diff, merge, FieldChange};
    use crate::pattern::Blacklist;
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    /// Test case for merge operations.
    struct MergeTestCase {
        name: &'static str,
        blacklist: &'static [(&'static str, &'static str)],
        original: &'static str,
        updates: &'static str,
        merged: &'static str,
        changes: &'static [(&'static str, Option<&'static str>, &'static str)],
    }

    const TARGET: &str = "pages";

    fn json(text: &str) -> Value {
        from_json(text).unwrap_or_else(|e| panic!("bad JSON {}: {}", text, e))
    }

    fn blacklist(entries: &[(&str, &str)]) -> Blacklist {
        let mut blacklist = Blacklist::new();
        for (target, pattern) in entries {
            blacklist.add(*target, pattern).unwrap();
        }
        blacklist
    }

    fn expected_changes(entries: &[(&str, Option<&str>, &str)]) -> Vec<FieldChange> {
        entries
            .iter()
            .map(|(path, old, new)| {
                FieldChange::new(parse_path(path).unwrap(), old.map(json), json(new))
            })
            .collect()
    }

    fn run_merge_test_case(tc: &MergeTestCase) {
        let blacklist = blacklist(tc.blacklist);
        let original = json(tc.original);
        let updates = json(tc.updates);

        let result = merge(&original, &updates, TARGET, &blacklist);
        assert_eq!(result.merged, json(tc.merged), "merged tree for {}", tc.name);
        assert_eq!(
            result.changes,
            expected_changes(tc.changes),
            "changes for {}",
            tc.name
        );
        assert_eq!(original, json(tc.original), "original mutated in {}", tc.name);
    }

    #[test]
    fn test_merge_cases() {
        let cases = [
            MergeTestCase {
                name: "scalar replaced",
                blacklist: &[],
                original: r#"{"title":"Old","body":"Same"}"#,
                updates: r#"{"title":"New","body":"Same"}"#,
                merged: r#"{"title":"New","body":"Same"}"#,
                changes: &[("title", Some(r#""Old""#), r#""New""#)],
            },
            MergeTestCase {
                name: "keys only in original are kept",
                blacklist: &[],
                original: r#"{"a":1,"b":2}"#,
                updates: r#"{"a":1}"#,
                merged: r#"{"a":1,"b":2}"#,
                changes: &[],
            },
            MergeTestCase {
                name: "addition reported at leaf",
                blacklist: &[],
                original: r#"{}"#,
                updates: r#"{"a":{"b":1}}"#,
                merged: r#"{"a":{"b":1}}"#,
                changes: &[("a.b", None, "1")],
            },
            MergeTestCase {
                name: "shorter array keeps original tail",
                blacklist: &[],
                original: r#"{"list":["a","b","c"]}"#,
                updates: r#"{"list":["x"]}"#,
                merged: r#"{"list":["x","b","c"]}"#,
                changes: &[("list[0]", Some(r#""a""#), r#""x""#)],
            },
            MergeTestCase {
                name: "longer array appends additions",
                blacklist: &[],
                original: r#"{"list":[1]}"#,
                updates: r#"{"list":[1,{"k":2}]}"#,
                merged: r#"{"list":[1,{"k":2}]}"#,
                changes: &[("list[1]", None, r#"{"k":2}"#)],
            },
            MergeTestCase {
                name: "shape conflict replaces whole node",
                blacklist: &[],
                original: r#"{"hero":"plain","items":{"k":1}}"#,
                updates: r#"{"hero":{"title":"T"},"items":[1]}"#,
                merged: r#"{"hero":{"title":"T"},"items":[1]}"#,
                changes: &[
                    ("hero", Some(r#""plain""#), r#"{"title":"T"}"#),
                    ("items", Some(r#"{"k":1}"#), "[1]"),
                ],
            },
            MergeTestCase {
                name: "null original is a shape conflict",
                blacklist: &[],
                original: r#"{"meta":null}"#,
                updates: r#"{"meta":{"k":"v"}}"#,
                merged: r#"{"meta":{"k":"v"}}"#,
                changes: &[("meta", Some("null"), r#"{"k":"v"}"#)],
            },
            MergeTestCase {
                name: "blacklisted subtree wins",
                blacklist: &[("*", "metaData")],
                original: r#"{"metaData":{"v":1},"title":"a"}"#,
                updates: r#"{"metaData":{"v":2},"title":"b"}"#,
                merged: r#"{"metaData":{"v":1},"title":"b"}"#,
                changes: &[("title", Some(r#""a""#), r#""b""#)],
            },
            MergeTestCase {
                name: "blacklisted leaf absent from original stays absent",
                blacklist: &[("*", "**.id")],
                original: r#"{"items":[{"name":"a"}]}"#,
                updates: r#"{"items":[{"name":"a","id":9}]}"#,
                merged: r#"{"items":[{"name":"a"}]}"#,
                changes: &[],
            },
            MergeTestCase {
                name: "blacklist scoped to another target is ignored",
                blacklist: &[("posts", "title")],
                original: r#"{"title":"a"}"#,
                updates: r#"{"title":"b"}"#,
                merged: r#"{"title":"b"}"#,
                changes: &[("title", Some(r#""a""#), r#""b""#)],
            },
            MergeTestCase {
                name: "integer and float compare by value",
                blacklist: &[],
                original: r#"{"price":10.0}"#,
                updates: r#"{"price":10}"#,
                merged: r#"{"price":10.0}"#,
                changes: &[],
            },
            MergeTestCase {
                name: "added empty container is one change",
                blacklist: &[],
                original: r#"{}"#,
                updates: r#"{"tags":[],"meta":{}}"#,
                merged: r#"{"tags":[],"meta":{}}"#,
                changes: &[("tags", None, "[]"), ("meta", None, "{}")],
            },
            MergeTestCase {
                name: "null update replaces value",
                blacklist: &[],
                original: r#"{"a":"x"}"#,
                updates: r#"{"a":null,"b":null}"#,
                merged: r#"{"a":null,"b":null}"#,
                changes: &[("a", Some(r#""x""#), "null"), ("b", None, "null")],
            },
        ];

        for tc in &cases {
            run_merge_test_case(tc);
        }
    }

    #[test]
    fn test_merge_keeps_original_key_order() {
        let original = json(r#"{"z":1,"a":2}"#);
        let updates = json(r#"{"new":3,"a":5}"#);
        let result = merge(&original, &updates, TARGET, &Blacklist::new());
        let keys: Vec<&String> = result.merged.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "new"]);
    }

    #[test]
    fn test_diff_matches_merge_changes() {
        let original = json(r#"{"title":"a","list":[1,2],"nested":{"x":true}}"#);
        let updates = json(r#"{"title":"b","list":[1,3,4],"nested":{"x":false,"y":1}}"#);
        let blacklist = Blacklist::new();

        let merged = merge(&original, &updates, TARGET, &blacklist);
        assert!(merged.has_changes());
        assert_eq!(diff(&original, &updates, TARGET, &blacklist), merged.changes);
    }

    #[test]
    fn test_blacklisted_leaf_under_blacklisted_ancestor() {
        // The ancestor check stops the walk before the leaf is reached.
        let blacklist = blacklist(&[("*", "settings"), ("*", "settings.secret")]);
        let original = json(r#"{"settings":{"secret":"a"}}"#);
        let updates = json(r#"{"settings":{"secret":"b"}}"#);

        let result = merge(&original, &updates, TARGET, &blacklist);
        assert!(result.changes.is_empty());
        assert_eq!(result.merged, original);
        assert!(diff(&original, &updates, TARGET, &blacklist).is_empty());
    }

    #[test]
    fn test_blacklisted_leaf_under_open_ancestor() {
        // An appended array element is recorded whole; the diff filter is what
        // keeps a blacklisted element path out of the report.
        let blacklist = blacklist(&[("*", "list[1]")]);
        let original = json(r#"{"list":["a"]}"#);
        let updates = json(r#"{"list":["a","secret"]}"#);

        let result = merge(&original, &updates, TARGET, &blacklist);
        assert_eq!(
            result.changes,
            expected_changes(&[("list[1]", None, r#""secret""#)])
        );
        assert!(diff(&original, &updates, TARGET, &blacklist).is_empty());

        // A blacklisted key inside an object is never visited at all.
        let blacklist = blacklist_for_key();
        let original = json(r#"{"card":{"token":"x","label":"a"}}"#);
        let updates = json(r#"{"card":{"token":"y","label":"b"}}"#);
        let result = merge(&original, &updates, TARGET, &blacklist);
        assert_eq!(
            result.changes,
            expected_changes(&[("card.label", Some(r#""a""#), r#""b""#)])
        );
        assert_eq!(diff(&original, &updates, TARGET, &blacklist), result.changes);
    }

    fn blacklist_for_key() -> Blacklist {
        blacklist(&[(TARGET, "card.token")])
    }
}
