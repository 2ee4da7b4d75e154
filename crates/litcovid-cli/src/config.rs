//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for litcovid
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub convert: ConvertSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertSection {
    /// Log a progress line every N documents
    pub progress_every: usize,
    /// Indented JSON output
    pub pretty: bool,
    /// Drop documents with neither id nor passages
    pub skip_empty: bool,
    /// Write through `<output>.tmp` and rename on success
    pub atomic: bool,
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            progress_every: 100,
            pretty: false,
            skip_empty: false,
            atomic: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub progress_every: usize,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            progress_every: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./litcovid.toml (current directory)
    /// 2. ~/.config/litcovid/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("litcovid.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "litcovid") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
