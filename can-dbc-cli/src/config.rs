//! Configuration loading and parsing

use anyhow::{Context, Result};
use can_dbc_decoder::TransmuteConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub transmute: TransmuteConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON output
    #[serde(default)]
    pub pretty: bool,
    /// Directory for per-file output (multiple inputs)
    pub dir: Option<PathBuf>,
    /// Fail when any error-severity problem is found
    #[serde(default)]
    pub strict: bool,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
