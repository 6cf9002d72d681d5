//! Locating and reading the configuration file.

use super::{ConfigError, SyncConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched for in the working directory, in order. YAML is a
/// superset of JSON, so one parser reads all three.
pub const CONFIG_FILENAMES: [&str; 3] = ["sheet-sync.yaml", "sheet-sync.yml", "sheet-sync.json"];

pub const ENV_SPREADSHEET_ID: &str = "SHEET_SYNC_SPREADSHEET_ID";
pub const ENV_CREDENTIALS_PATH: &str = "GOOGLE_CREDENTIALS_PATH";

/// Loads and validates the configuration.
///
/// With `path` the file must exist. Without it the working directory is
/// searched for [`CONFIG_FILENAMES`]; when none exists the configuration is
/// built from the environment alone.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Read {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_with_env(path, &cwd, |key| std::env::var(key).ok())
}

/// [`load_config`] with the working directory and environment supplied by
/// the caller.
pub fn load_config_with_env<F>(path: Option<&Path>, cwd: &Path, env: F) -> Result<SyncConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

    let file = match path {
        Some(path) => Some(cwd.join(path)),
        None => find_config_file(cwd),
    };

    let mut config = match file {
        Some(file) => read_config_file(&file)?,
        None => {
            let (Some(spreadsheet_id), Some(credentials_path)) =
                (lookup(ENV_SPREADSHEET_ID), lookup(ENV_CREDENTIALS_PATH))
            else {
                return Err(ConfigError::NotFound {
                    dir: cwd.display().to_string(),
                });
            };
            debug!("no config file found, using environment");
            let mut config = SyncConfig::new(spreadsheet_id);
            config.credentials_path = credentials_path;
            config
        }
    };

    if let Some(credentials_path) = lookup(ENV_CREDENTIALS_PATH) {
        config.credentials_path = credentials_path;
    }
    if let Some(spreadsheet_id) = lookup(ENV_SPREADSHEET_ID) {
        config.spreadsheet_id = spreadsheet_id;
    }

    config.validate()?;
    Ok(config)
}

fn find_config_file(cwd: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| cwd.join(name))
        .find(|candidate| candidate.is_file())
}

fn read_config_file(path: &Path) -> Result<SyncConfig, ConfigError> {
    debug!(path = %path.display(), "reading config");
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
