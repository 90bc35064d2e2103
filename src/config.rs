//! Orchestrator configuration

use crate::error::{Result, ScribeError};
use crate::mapper::DEFAULT_LANGUAGE;
use crate::types::Policy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for [`crate::CronScribe`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    /// Directory of rule documents; built-in rule sets when unset
    pub rules_dir: Option<PathBuf>,

    /// Initially selected language
    pub language: String,

    /// When to consult an external generator
    pub policy: Policy,

    /// Upper bound for a single generator call
    pub generator_timeout_ms: u64,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            rules_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            policy: Policy::default(),
            generator_timeout_ms: 30_000,
        }
    }
}

impl ScribeConfig {
    /// Read a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScribeError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_yaml::from_str(&text).map_err(|e| {
            ScribeError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_millis(self.generator_timeout_ms)
    }
}
