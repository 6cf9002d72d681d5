//! # sheet-sync
//!
//! Keeps spreadsheet rows and nested JSON documents in step.
//!
//! A document is synced through a sheet in one of two layouts: a key-value
//! sheet with one `Key Path | Value` row per leaf, or an array-of-records
//! sheet with one row per element of an array inside the document. Pulling
//! merges sheet contents into the local document without ever touching
//! blacklisted paths, and reports each field it changed. Pushing validates
//! the local documents against path-scoped rules and only then exports them.
//!
//! ## Modules
//!
//! - [`value`] - In-memory JSON-like trees
//! - [`fieldpath`] - Dotted/bracketed paths and tree access by path
//! - [`tabular`] - Conversion between trees and sheet rows
//! - [`pattern`] - Glob-style path patterns and per-target blacklists
//! - [`merge`] - Blacklist-aware merge and diff with change tracking
//! - [`validate`] - Path-scoped validation rules over string leaves
//! - [`config`] - Configuration file loading and compilation
//! - [`sync`] - Pull, diff and push over sheet and document stores

pub mod config;
pub mod fieldpath;
pub mod logging;
pub mod merge;
pub mod pattern;
pub mod sync;
pub mod tabular;
pub mod validate;
pub mod value;

pub use config::{load_config, CompiledConfig, ConfigError, SyncConfig, TargetConfig};
pub use fieldpath::{parse_path, Path, PathElement, PathError};
pub use merge::{diff, merge, FieldChange, MergeResult};
pub use pattern::{Blacklist, PathPattern, PatternError};
pub use sync::{SyncError, SyncResult};
pub use validate::{validate, ValidationError, ValidationErrors, ValidationRule};
pub use value::Value;
