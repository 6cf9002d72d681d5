//! Diff: report what a pull would change.

use super::{incoming, selected_targets, DocumentStore, SheetStore, SyncError, SyncResult};
use crate::config::CompiledConfig;
use crate::merge;
use tracing::info;

/// DiffOptions controls [`diff`].
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Diff only this target.
    pub file: Option<String>,
}

/// Compares each target's sheet with its document without writing anything.
pub fn diff(
    config: &CompiledConfig,
    sheets: &dyn SheetStore,
    docs: &dyn DocumentStore,
    options: &DiffOptions,
) -> Result<Vec<SyncResult>, SyncError> {
    let mut results = Vec::new();
    for target in selected_targets(config, options.file.as_deref()) {
        let Some((original, updates)) = incoming(config, sheets, docs, &target)? else {
            results.push(SyncResult::unchanged(target));
            continue;
        };

        let changes = merge::diff(&original, &updates, &target, &config.blacklist);
        info!(target_name = %target, changes = changes.len(), "diffed");
        results.push(SyncResult::with_changes(target, changes));
    }
    Ok(results)
}
