//! Tests for pull, diff and push over in-memory stores.

#[cfg(test)]
mod tests {
    use crate::config::{CompiledConfig, SyncConfig, TargetConfig};
    use crate::sync::{
        diff, pull, push, DiffOptions, DocumentStore, MemoryDocumentStore, MemorySheetStore,
        PullOptions, PushOptions, SheetStore, StoreError, SyncError,
    };
    use crate::tabular::SheetData;
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    fn json(text: &str) -> Value {
        from_json(text).unwrap()
    }

    fn rows(data: &[&[&str]]) -> SheetData {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn config() -> CompiledConfig {
        serde_yaml::from_str::<SyncConfig>(
            r#"
spreadsheetId: test
files:
  global: { type: keyvalue }
  collections: { type: array, arrayPath: content.collections }
blacklist:
  "*": [metaData, "**.id"]
  collections: ["content.collections[*].image"]
validation:
  - match: "**.href"
    message: must be https:// or local path
    rule: { pattern: "^(https://|/)" }
"#,
        )
        .unwrap()
        .compile()
        .unwrap()
    }

    fn documents() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
            .with_document(
                "global",
                json(r#"{"metaData":{"version":1},"hero":{"title":"Old","href":"/home"}}"#),
            )
            .with_document(
                "collections",
                json(
                    r#"{"title":"Shop","content":{"collections":[
                        {"id":1,"name":"Hats","image":"hats.png"},
                        {"id":2,"name":"Shoes","image":"shoes.png"}]}}"#,
                ),
            )
    }

    fn sheets() -> MemorySheetStore {
        MemorySheetStore::new()
            .with_sheet(
                "global",
                rows(&[
                    &["Key Path", "Value"],
                    &["metaData.version", "9"],
                    &["hero.title", "New"],
                    &["hero.href", "/home"],
                ]),
            )
            .with_sheet(
                "collections",
                rows(&[
                    &["id", "name", "image"],
                    &["7", "Caps", "x.png"],
                    &["8", "Shoes", "y.png"],
                ]),
            )
    }

    #[test]
    fn test_pull_merges_and_writes() {
        let config = config();
        let mut docs = documents();
        let results = pull(&config, &sheets(), &mut docs, &PullOptions::default()).unwrap();

        let summary: Vec<(String, Vec<String>)> = results
            .iter()
            .map(|r| {
                (
                    r.target.clone(),
                    r.changes.iter().map(|c| c.path.to_string()).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "collections".to_string(),
                    vec!["content.collections[0].name".to_string()]
                ),
                ("global".to_string(), vec!["hero.title".to_string()]),
            ]
        );

        assert_eq!(
            docs.get("global"),
            Some(&json(
                r#"{"metaData":{"version":1},"hero":{"title":"New","href":"/home"}}"#
            ))
        );
        assert_eq!(
            docs.get("collections"),
            Some(&json(
                r#"{"title":"Shop","content":{"collections":[
                    {"id":1,"name":"Caps","image":"hats.png"},
                    {"id":2,"name":"Shoes","image":"shoes.png"}]}}"#
            ))
        );
        assert_eq!(docs.writes(), 2);
    }

    #[test]
    fn test_pull_dry_run_and_single_file() {
        let config = config();
        let mut docs = documents();
        let options = PullOptions {
            dry_run: true,
            file: Some("global".to_string()),
        };
        let results = pull(&config, &sheets(), &mut docs, &options).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].has_changes);
        assert_eq!(docs.writes(), 0);
        assert_eq!(docs.get("global"), documents().get("global"));
    }

    #[test]
    fn test_pull_skips_missing_and_empty_sheets() {
        let config = config();
        let sheets = MemorySheetStore::new().with_sheet("global", rows(&[&["Key Path", "Value"]]));
        let mut docs = documents();

        let results = pull(&config, &sheets, &mut docs, &PullOptions::default()).unwrap();
        assert!(results.iter().all(|r| !r.has_changes));

        let options = PullOptions {
            dry_run: false,
            file: Some("unknown".to_string()),
        };
        let results = pull(&config, &sheets, &mut docs, &options).unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].has_changes);
        assert_eq!(docs.writes(), 0);
    }

    #[test]
    fn test_pull_into_missing_document() {
        let config = config();
        let mut docs = MemoryDocumentStore::new();
        let options = PullOptions {
            dry_run: false,
            file: Some("global".to_string()),
        };
        pull(&config, &sheets(), &mut docs, &options).unwrap();
        assert_eq!(
            docs.get("global"),
            Some(&json(r#"{"hero":{"title":"New","href":"/home"}}"#))
        );
    }

    #[test]
    fn test_diff_reports_without_writing() {
        let config = config();
        let docs = documents();
        let results = diff(&config, &sheets(), &docs, &DiffOptions::default()).unwrap();

        let changed: Vec<&str> = results
            .iter()
            .filter(|r| r.has_changes)
            .map(|r| r.target.as_str())
            .collect();
        assert_eq!(changed, vec!["collections", "global"]);
        assert_eq!(docs.writes(), 0);
    }

    #[test]
    fn test_push_writes_sheets() {
        let config = config();
        let mut sheets = MemorySheetStore::new();
        let result = push(&config, &mut sheets, &documents(), &PushOptions::default()).unwrap();

        assert!(!result.is_rejected());
        assert_eq!(result.results.len(), 2);
        assert_eq!(
            sheets.read("global").unwrap(),
            rows(&[
                &["Key Path", "Value"],
                &["hero.title", "Old"],
                &["hero.href", "/home"],
            ])
        );
        assert_eq!(
            sheets.read("collections").unwrap(),
            rows(&[&["name"], &["Hats"], &["Shoes"]])
        );
    }

    #[test]
    fn test_push_rejects_invalid_documents() {
        let config = config();
        let docs = documents().with_document(
            "global",
            json(r#"{"hero":{"href":"ftp://x"},"footer":{"href":"http://y"}}"#),
        );
        let mut sheets = MemorySheetStore::new();
        let result = push(&config, &mut sheets, &docs, &PushOptions::default()).unwrap();

        assert!(result.is_rejected());
        assert!(result.results.is_empty());
        assert_eq!(result.validation_errors.len(), 1);
        assert_eq!(result.validation_errors[0].target, "global");
        let paths: Vec<&str> = result.validation_errors[0]
            .errors
            .iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(paths, vec!["hero.href", "footer.href"]);
        assert!(!sheets.exists("global").unwrap());
        assert!(!sheets.exists("collections").unwrap());
    }

    #[test]
    fn test_push_missing_document_is_an_error() {
        let config = config();
        let mut sheets = MemorySheetStore::new();
        let options = PushOptions {
            file: Some("global".to_string()),
        };
        let result = push(&config, &mut sheets, &MemoryDocumentStore::new(), &options);
        assert!(matches!(
            result,
            Err(SyncError::Store(StoreError::MissingDocument(_)))
        ));
    }

    #[test]
    fn test_push_then_pull_is_stable() {
        let config = config();
        let mut sheets = MemorySheetStore::new();
        let mut docs = documents();
        push(&config, &mut sheets, &docs, &PushOptions::default()).unwrap();

        let results = pull(&config, &sheets, &mut docs, &PullOptions::default()).unwrap();
        assert!(results.iter().all(|r| !r.has_changes), "{:?}", results);
        assert_eq!(docs.writes(), 0);
    }

    #[test]
    fn test_array_target_without_array_is_empty_sheet() {
        let mut config = config();
        config.files.insert(
            "posts".to_string(),
            TargetConfig::Array {
                array_path: "items".to_string(),
            },
        );
        let docs = MemoryDocumentStore::new().with_document("posts", json(r#"{"items":"none"}"#));
        let mut sheets = MemorySheetStore::new();
        let options = PushOptions {
            file: Some("posts".to_string()),
        };
        push(&config, &mut sheets, &docs, &options).unwrap();
        assert_eq!(sheets.read("posts").unwrap(), vec![Vec::<String>::new()]);
        assert!(docs.read("posts").unwrap().is_some());
    }
}
