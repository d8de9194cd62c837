//! Engine configuration loaded from a JSON file.
//!
//! Resolution order:
//!
//! 1. an explicit path (the CLI's `--config` flag)
//! 2. the `TAGNORM_CONFIG` environment variable
//! 3. `{config_dir}/tagnorm/config.json`, where `config_dir` is:
//!    - Linux: `~/.config`
//!    - macOS: `~/Library/Application Support`
//!    - Windows: `C:\Users\<user>\AppData\Roaming`
//!
//! A missing file at the default location means built-in defaults; a missing
//! explicit or environment-supplied file is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Similarity;
use crate::extractors::DEFAULT_MAX_VALUE_LEN;
use crate::grouping::PatternTable;
use crate::similarity::{DEFAULT_MAX_DISTANCE, DEFAULT_THRESHOLD};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "TAGNORM_CONFIG";

/// Tunable engine settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_distance: usize,
    pub similarity_threshold: f64,
    pub max_value_len: usize,
    /// Curated patterns; the built-in table is used when absent.
    pub patterns: Option<PatternTable>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            similarity_threshold: DEFAULT_THRESHOLD,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            patterns: None,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolves the config from `explicit`, the environment, or the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be loaded.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        match default_config_path() {
            Ok(path) if path.exists() => Self::load(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!(error = %e, "no config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Returns the similarity settings.
    pub fn similarity(&self) -> Similarity {
        Similarity::new(self.max_distance, self.similarity_threshold)
    }

    /// Returns the configured patterns, or the built-in table.
    pub fn pattern_table(&self) -> PatternTable {
        self.patterns.clone().unwrap_or_else(PatternTable::builtin)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.similarity_threshold),
            "similarity_threshold must be between 0 and 1, got {}",
            self.similarity_threshold
        );
        anyhow::ensure!(self.max_value_len > 0, "max_value_len must be positive");
        Ok(())
    }
}

/// Gets the cross-platform default config path.
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;

    Ok(config_dir.join("tagnorm").join("config.json"))
}
