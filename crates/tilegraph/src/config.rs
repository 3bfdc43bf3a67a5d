//! Generation tuning knobs and their TOML file form.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Soft cap on total node count; branches only fill what the main path leaves over.
    pub target_size: usize,
    /// Attempt budget for main-path growth.
    pub max_attempts: u32,
    /// Main-path nodes (start included) required before the end room is attempted.
    pub min_path_length: usize,
    pub max_branches: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { target_size: 12, max_attempts: 500, min_path_length: 8, max_branches: 3 }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    /// The start node alone always satisfies a zero minimum.
    pub(crate) fn effective_min_path_length(&self) -> usize {
        self.min_path_length.max(1)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid generator config: {0}")]
    Parse(String),
}
