//! Config module - Sync configuration: targets, blacklist and validation rules.
//!
//! A configuration file names every synced document (a *target*), how its
//! sheet is laid out, which paths are never synced, and which rules a
//! document must pass before it is pushed.
//!
//! ```yaml
//! spreadsheetId: 1AbC
//! files:
//!   global: { type: keyvalue }
//!   collections: { type: array, arrayPath: content.collections }
//! blacklist:
//!   "*": [metaData, "**.id"]
//! validation:
//!   - match: "**.href"
//!     message: must be https:// or a local path
//!     rule: { pattern: "^(https://|/)" }
//! ```

mod loader;

pub use loader::*;

use crate::fieldpath::{parse_path, PathError};
use crate::pattern::{Blacklist, BlacklistConfig, PatternError};
use crate::validate::{RuleError, ValidationRule, ValidationRuleConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CREDENTIALS_PATH: &str = "./google-credentials.json";
pub const DEFAULT_DATA_DIR: &str = "public/data";

/// ConfigError is returned when configuration cannot be loaded or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found in {dir}; create {} or set {} and {}", CONFIG_FILENAMES[0], ENV_SPREADSHEET_ID, ENV_CREDENTIALS_PATH)]
    NotFound { dir: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("spreadsheetId is required")]
    MissingSpreadsheetId,

    #[error("target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("blacklist: {0}")]
    Pattern(#[from] PatternError),

    #[error("validation: {0}")]
    Rule(#[from] RuleError),
}

impl ConfigError {
    /// Creates an invalid target error.
    pub fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// TargetConfig says how a target's sheet maps onto its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TargetConfig {
    /// Two-column `Key Path | Value` sheet covering the whole document.
    #[serde(rename = "keyvalue")]
    KeyValue,
    /// One row per record of the array found at `array_path`.
    #[serde(rename = "array")]
    Array {
        #[serde(rename = "arrayPath", default)]
        array_path: String,
    },
}

/// SyncConfig is the configuration file as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub files: BTreeMap<String, TargetConfig>,
    #[serde(default)]
    pub blacklist: BlacklistConfig,
    #[serde(default)]
    pub validation: Vec<ValidationRuleConfig>,
}

fn default_credentials_path() -> String {
    DEFAULT_CREDENTIALS_PATH.to_string()
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

impl SyncConfig {
    /// Creates a configuration with defaults and no targets.
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        SyncConfig {
            spreadsheet_id: spreadsheet_id.into(),
            credentials_path: default_credentials_path(),
            data_dir: default_data_dir(),
            files: BTreeMap::new(),
            blacklist: BlacklistConfig::new(),
            validation: Vec::new(),
        }
    }

    /// Checks the configuration, compiling every pattern and rule once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compile().map(|_| ())
    }

    /// Compiles the blacklist patterns.
    pub fn compile_blacklist(&self) -> Result<Blacklist, PatternError> {
        Blacklist::compile(&self.blacklist)
    }

    /// Compiles the validation rules, preserving their order.
    pub fn compile_rules(&self) -> Result<Vec<ValidationRule>, RuleError> {
        self.validation.iter().map(ValidationRule::from_config).collect()
    }

    /// Validates the configuration and compiles it for use by the sync
    /// operations.
    pub fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::MissingSpreadsheetId);
        }
        for (target, file) in &self.files {
            check_target(target, file)?;
        }

        Ok(CompiledConfig {
            data_dir: PathBuf::from(&self.data_dir),
            files: self.files.clone(),
            blacklist: self.compile_blacklist()?,
            rules: self.compile_rules()?,
        })
    }
}

fn check_target(target: &str, file: &TargetConfig) -> Result<(), ConfigError> {
    if target.is_empty() {
        return Err(ConfigError::invalid_target(target, "target name is empty"));
    }
    let TargetConfig::Array { array_path } = file else {
        return Ok(());
    };
    if array_path.is_empty() {
        return Err(ConfigError::invalid_target(target, "array targets require arrayPath"));
    }
    let path = parse_path(array_path).map_err(|e| match e {
        PathError::Malformed { reason, .. } => ConfigError::invalid_target(target, reason),
    })?;
    if path.iter().any(|element| element.is_index()) {
        return Err(ConfigError::invalid_target(
            target,
            format!("arrayPath {:?} must be a dotted key path", array_path),
        ));
    }
    Ok(())
}

/// CompiledConfig is a validated configuration ready for syncing.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub data_dir: PathBuf,
    pub files: BTreeMap<String, TargetConfig>,
    pub blacklist: Blacklist,
    pub rules: Vec<ValidationRule>,
}

impl CompiledConfig {
    /// Returns the mode of `target`, if configured.
    pub fn target(&self, target: &str) -> Option<&TargetConfig> {
        self.files.get(target)
    }
}
