//! Pull: merge sheet contents into local documents.

use super::{incoming, selected_targets, DocumentStore, SheetStore, SyncError, SyncResult};
use crate::config::CompiledConfig;
use crate::merge::merge;
use tracing::info;

/// PullOptions controls [`pull`].
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Report changes without writing documents.
    pub dry_run: bool,
    /// Pull only this target.
    pub file: Option<String>,
}

/// Merges each target's sheet into its document and writes the documents
/// that changed.
///
/// Blacklisted paths keep their local values. A target that is not
/// configured, has no sheet, or whose sheet has no data rows is reported
/// unchanged. A missing document is pulled into an empty one.
pub fn pull(
    config: &CompiledConfig,
    sheets: &dyn SheetStore,
    docs: &mut dyn DocumentStore,
    options: &PullOptions,
) -> Result<Vec<SyncResult>, SyncError> {
    let mut results = Vec::new();
    for target in selected_targets(config, options.file.as_deref()) {
        let Some((original, updates)) = incoming(config, sheets, &*docs, &target)? else {
            results.push(SyncResult::unchanged(target));
            continue;
        };

        let merged = merge(&original, &updates, &target, &config.blacklist);
        if merged.has_changes() && !options.dry_run {
            docs.write(&target, &merged.merged)?;
        }
        info!(
            target_name = %target,
            changes = merged.changes.len(),
            dry_run = options.dry_run,
            "pulled"
        );
        results.push(SyncResult::with_changes(target, merged.changes));
    }
    Ok(results)
}
