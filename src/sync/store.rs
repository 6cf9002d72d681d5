//! Storage seams for sheets and documents.
//!
//! The sync operations only talk to these traits. The remote spreadsheet
//! client lives outside this crate; [`DirSheetStore`] keeps sheets as local
//! JSON files so the command line tool works without one.

use crate::tabular::SheetData;
use crate::value::{from_json, to_json_pretty, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// StoreError is returned by sheet and document stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("sheet {0:?} does not exist")]
    MissingSheet(String),

    #[error("document {0:?} does not exist")]
    MissingDocument(String),

    #[error("invalid name {0:?}")]
    InvalidName(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// SheetStore reads and writes whole sheets of a spreadsheet by name.
pub trait SheetStore {
    /// Returns every row of the sheet.
    fn read(&self, sheet: &str) -> Result<SheetData, StoreError>;
    /// Replaces the sheet's contents with `rows`. The sheet must exist.
    fn write(&mut self, sheet: &str, rows: &SheetData) -> Result<(), StoreError>;
    fn exists(&self, sheet: &str) -> Result<bool, StoreError>;
    /// Adds an empty sheet.
    fn create(&mut self, sheet: &str) -> Result<(), StoreError>;
}

/// DocumentStore holds one document per target.
pub trait DocumentStore {
    /// Returns the document, or `None` if it has never been written.
    fn read(&self, target: &str) -> Result<Option<Value>, StoreError>;
    fn write(&mut self, target: &str, document: &Value) -> Result<(), StoreError>;
}

/// MemorySheetStore keeps sheets in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySheetStore {
    sheets: BTreeMap<String, SheetData>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        MemorySheetStore::default()
    }

    /// Builder that adds a sheet with `rows`.
    pub fn with_sheet(mut self, sheet: impl Into<String>, rows: SheetData) -> Self {
        self.sheets.insert(sheet.into(), rows);
        self
    }

    /// Returns the rows of a sheet, if it exists.
    pub fn get(&self, sheet: &str) -> Option<&SheetData> {
        self.sheets.get(sheet)
    }
}

impl SheetStore for MemorySheetStore {
    fn read(&self, sheet: &str) -> Result<SheetData, StoreError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| StoreError::MissingSheet(sheet.to_string()))
    }

    fn write(&mut self, sheet: &str, rows: &SheetData) -> Result<(), StoreError> {
        match self.sheets.get_mut(sheet) {
            Some(existing) => {
                *existing = rows.clone();
                Ok(())
            }
            None => Err(StoreError::MissingSheet(sheet.to_string())),
        }
    }

    fn exists(&self, sheet: &str) -> Result<bool, StoreError> {
        Ok(self.sheets.contains_key(sheet))
    }

    fn create(&mut self, sheet: &str) -> Result<(), StoreError> {
        self.sheets.entry(sheet.to_string()).or_default();
        Ok(())
    }
}

/// DirSheetStore keeps each sheet as `{dir}/{sheet}.json`, a JSON array of
/// string rows.
#[derive(Debug, Clone)]
pub struct DirSheetStore {
    dir: PathBuf,
}

impl DirSheetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSheetStore { dir: dir.into() }
    }

    fn sheet_path(&self, sheet: &str) -> Result<PathBuf, StoreError> {
        file_for(&self.dir, sheet)
    }
}

impl SheetStore for DirSheetStore {
    fn read(&self, sheet: &str) -> Result<SheetData, StoreError> {
        let path = self.sheet_path(sheet)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::MissingSheet(sheet.to_string()))
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::json(&path, e))
    }

    fn write(&mut self, sheet: &str, rows: &SheetData) -> Result<(), StoreError> {
        let path = self.sheet_path(sheet)?;
        if !path.is_file() {
            return Err(StoreError::MissingSheet(sheet.to_string()));
        }
        write_json(&path, rows)
    }

    fn exists(&self, sheet: &str) -> Result<bool, StoreError> {
        Ok(self.sheet_path(sheet)?.is_file())
    }

    fn create(&mut self, sheet: &str) -> Result<(), StoreError> {
        let path = self.sheet_path(sheet)?;
        if path.is_file() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        write_json(&path, &SheetData::new())
    }
}

/// JsonFileStore keeps each document as pretty-printed `{data_dir}/{target}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self, target: &str) -> Result<Option<Value>, StoreError> {
        let path = file_for(&self.data_dir, target)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        from_json(&text)
            .map(Some)
            .map_err(|e| StoreError::json(&path, e))
    }

    fn write(&mut self, target: &str, document: &Value) -> Result<(), StoreError> {
        let path = file_for(&self.data_dir, target)?;
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;
        let mut text = to_json_pretty(document).map_err(|e| StoreError::json(&path, e))?;
        text.push('\n');
        debug!(path = %path.display(), "writing document");
        fs::write(&path, text).map_err(|e| StoreError::io(&path, e))
    }
}

/// MemoryDocumentStore keeps documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: BTreeMap<String, Value>,
    writes: usize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        MemoryDocumentStore::default()
    }

    /// Builder that adds a document.
    pub fn with_document(mut self, target: impl Into<String>, document: Value) -> Self {
        self.documents.insert(target.into(), document);
        self
    }

    pub fn get(&self, target: &str) -> Option<&Value> {
        self.documents.get(target)
    }

    /// Number of writes made through [`DocumentStore::write`].
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, target: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.get(target).cloned())
    }

    fn write(&mut self, target: &str, document: &Value) -> Result<(), StoreError> {
        self.documents.insert(target.to_string(), document.clone());
        self.writes += 1;
        Ok(())
    }
}

/// Maps a sheet or target name to `{dir}/{name}.json`, refusing names that
/// would leave `dir`.
fn file_for(dir: &Path, name: &str) -> Result<PathBuf, StoreError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!("{}.json", name)))
}

fn write_json(path: &Path, rows: &SheetData) -> Result<(), StoreError> {
    let mut text = serde_json::to_string_pretty(rows).map_err(|e| StoreError::json(path, e))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| StoreError::io(path, e))
}
