//! Push: export local documents to sheets.

use super::{selected_targets, DocumentStore, SheetStore, StoreError, SyncError, SyncResult};
use crate::config::{CompiledConfig, TargetConfig};
use crate::fieldpath::get_str;
use crate::tabular::{keyvalue, records, SheetData};
use crate::validate::{validate, ValidationErrors};
use crate::value::Value;
use tracing::{info, warn};

/// PushOptions controls [`push`].
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Push only this target.
    pub file: Option<String>,
}

/// TargetValidationErrors are the validation errors of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetValidationErrors {
    pub target: String,
    pub errors: ValidationErrors,
}

/// PushResult is the outcome of [`push`].
///
/// When any document fails validation, `validation_errors` lists every
/// failing document and nothing was written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushResult {
    pub results: Vec<SyncResult>,
    pub validation_errors: Vec<TargetValidationErrors>,
}

impl PushResult {
    pub fn is_rejected(&self) -> bool {
        !self.validation_errors.is_empty()
    }
}

/// Validates every selected document against the configured rules, then,
/// only if all pass, writes each one to its sheet, creating sheets as needed.
pub fn push(
    config: &CompiledConfig,
    sheets: &mut dyn SheetStore,
    docs: &dyn DocumentStore,
    options: &PushOptions,
) -> Result<PushResult, SyncError> {
    let mut targets = Vec::new();
    for target in selected_targets(config, options.file.as_deref()) {
        match config.target(&target) {
            Some(mode) => targets.push((target, mode)),
            None => warn!(target_name = %target, "target is not configured, skipping"),
        }
    }

    let mut documents = Vec::with_capacity(targets.len());
    let mut validation_errors = Vec::new();
    for (target, _) in &targets {
        let document = docs
            .read(target)?
            .ok_or_else(|| StoreError::MissingDocument(target.clone()))?;
        let errors = validate(&document, &config.rules);
        if !errors.is_empty() {
            warn!(target_name = %target, errors = errors.len(), "document failed validation");
            validation_errors.push(TargetValidationErrors {
                target: target.clone(),
                errors,
            });
        }
        documents.push(document);
    }
    if !validation_errors.is_empty() {
        return Ok(PushResult {
            results: Vec::new(),
            validation_errors,
        });
    }

    let mut results = Vec::with_capacity(targets.len());
    for ((target, mode), document) in targets.into_iter().zip(documents) {
        let rows = encode_document(&document, &target, mode, config)?;
        if !sheets.exists(&target)? {
            sheets.create(&target)?;
        }
        sheets.write(&target, &rows)?;
        info!(target_name = %target, rows = rows.len(), "pushed");
        results.push(SyncResult {
            target,
            has_changes: true,
            changes: Vec::new(),
        });
    }
    Ok(PushResult {
        results,
        validation_errors: Vec::new(),
    })
}

/// Renders a document as the sheet rows for its mode.
///
/// In array mode a missing or non-array value at the array path exports as
/// an empty record list.
pub fn encode_document(
    document: &Value,
    target: &str,
    mode: &TargetConfig,
    config: &CompiledConfig,
) -> Result<SheetData, SyncError> {
    match mode {
        TargetConfig::KeyValue => Ok(keyvalue::encode(document, target, &config.blacklist)),
        TargetConfig::Array { array_path } => {
            let items: &[Value] = match get_str(document, array_path)? {
                Some(Value::List(items)) => items.as_slice(),
                _ => &[],
            };
            Ok(records::encode(items, target, array_path, &config.blacklist))
        }
    }
}
