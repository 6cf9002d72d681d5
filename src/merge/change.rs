//! Field-level change records produced by merge and diff.

use crate::fieldpath::Path;
use crate::value::Value;
use std::fmt;

const DISPLAY_WIDTH: usize = 40;

/// FieldChange records one leaf or subtree replaced during a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Where the change happened.
    pub path: Path,
    /// The value before the merge; `None` marks an addition.
    pub old_value: Option<Value>,
    /// The value after the merge.
    pub new_value: Value,
}

impl FieldChange {
    /// Creates a new change record.
    pub fn new(path: Path, old_value: Option<Value>, new_value: Value) -> Self {
        FieldChange {
            path,
            old_value,
            new_value,
        }
    }

    /// Returns true if the path did not exist before the merge.
    pub fn is_addition(&self) -> bool {
        self.old_value.is_none()
    }
}

/// One display line: `  path: old → new`, each side as truncated JSON.
impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = match &self.old_value {
            Some(value) => truncate(&value.to_string(), DISPLAY_WIDTH),
            None => "undefined".to_string(),
        };
        let new = truncate(&self.new_value.to_string(), DISPLAY_WIDTH);
        write!(f, "  {}: {} → {}", self.path, old, new)
    }
}

/// MergeResult is the outcome of [`merge`](super::merge).
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub merged: Value,
    pub changes: Vec<FieldChange>,
}

impl MergeResult {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
