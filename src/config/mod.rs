pub mod models;

pub use models::{ApiShape, Config, Credentials, IpMethod};

use std::fs;
use std::path::{Path, PathBuf};

use validator::Validate;

use crate::error::{DdnsError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Resolves the config path the way cron-driven installs expect: relative to
/// the executable, not to the working directory.
pub fn resolve_path(arg: Option<&Path>, exe_dir: &Path) -> PathBuf {
    match arg {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => exe_dir.join(path),
        None => exe_dir.join(DEFAULT_CONFIG_FILE),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DdnsError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            DdnsError::ConfigInvalid(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)
            .map_err(|e| DdnsError::ConfigInvalid(e.to_string()))?;

        config
            .validate()
            .map_err(|e| DdnsError::ConfigInvalid(e.to_string()))?;

        Ok(config)
    }
}
