//! Sync module - Pull, diff and push between sheets and documents.
//!
//! Every operation runs per target, over either the single target named in
//! its options or every configured target in name order.

mod diff;
mod pull;
mod push;
mod store;

#[cfg(test)]
mod sync_test;

pub use diff::*;
pub use pull::*;
pub use push::*;
pub use store::*;

use crate::config::{CompiledConfig, TargetConfig};
use crate::fieldpath::{set_array_at_path, PathError};
use crate::merge::FieldChange;
use crate::tabular::{keyvalue, records, SheetRow};
use crate::value::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// SyncError is returned when a sync operation cannot complete.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// SyncResult is the outcome of one operation on one target.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncResult {
    pub target: String,
    pub has_changes: bool,
    pub changes: Vec<FieldChange>,
}

impl SyncResult {
    /// A result with no changes.
    pub fn unchanged(target: impl Into<String>) -> Self {
        SyncResult {
            target: target.into(),
            has_changes: false,
            changes: Vec::new(),
        }
    }

    /// A result carrying `changes`.
    pub fn with_changes(target: impl Into<String>, changes: Vec<FieldChange>) -> Self {
        SyncResult {
            target: target.into(),
            has_changes: !changes.is_empty(),
            changes,
        }
    }
}

/// The targets an operation runs over: `only` when given, else every
/// configured target.
fn selected_targets(config: &CompiledConfig, only: Option<&str>) -> Vec<String> {
    match only {
        Some(target) => vec![target.to_string()],
        None => config.files.keys().cloned().collect(),
    }
}

/// The original document and the sheet-derived updates for a pull or diff,
/// or `None` when the target has nothing to pull.
fn incoming(
    config: &CompiledConfig,
    sheets: &dyn SheetStore,
    docs: &dyn DocumentStore,
    target: &str,
) -> Result<Option<(Value, Value)>, SyncError> {
    let Some(mode) = config.target(target) else {
        warn!(target_name = target, "target is not configured, skipping");
        return Ok(None);
    };
    if !sheets.exists(target)? {
        warn!(target_name = target, "sheet does not exist, skipping");
        return Ok(None);
    }
    let rows = sheets.read(target)?;
    if rows.len() < 2 {
        return Ok(None);
    }

    let original = docs
        .read(target)?
        .unwrap_or_else(|| Value::Map(Map::new()));
    let updates = decode_updates(&original, &rows, mode)?;
    Ok(Some((original, updates)))
}

/// Decodes sheet rows into the tree they would make of `original`.
///
/// Key-value sheets describe the whole document. Array sheets replace only
/// the array at their configured path, in a copy of `original`.
pub fn decode_updates(original: &Value, rows: &[SheetRow], mode: &TargetConfig) -> Result<Value, PathError> {
    match mode {
        TargetConfig::KeyValue => keyvalue::decode(rows),
        TargetConfig::Array { array_path } => {
            let mut updates = original.clone();
            set_array_at_path(&mut updates, array_path, records::decode(rows)?)?;
            Ok(updates)
        }
    }
}
