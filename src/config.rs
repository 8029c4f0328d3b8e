use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::debug;

pub const CONFIG_FILE: &str = "textnotice.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output format (text, json)
    pub format: Option<String>,

    /// Title line printed before the first section
    pub title: Option<String>,

    /// Prefixes removed from rendered install paths
    pub strip_prefix: Option<Vec<String>>,

    /// Directory license text paths are relative to
    pub text_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some("text".to_string()),
            title: None,
            strip_prefix: None,
            text_root: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        match self.format.as_deref() {
            None | Some("text") | Some("json") => {}
            Some(other) => anyhow::bail!("Unknown format '{}' (expected text or json)", other),
        }

        if let Some(prefixes) = &self.strip_prefix {
            if prefixes.iter().any(|p| p.trim().is_empty()) {
                anyhow::bail!("strip_prefix entries must not be empty");
            }
        }

        Ok(())
    }
}

/// Load configuration from `textnotice.toml` in the current directory
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&current_dir)
}

/// Load `textnotice.toml` from `dir`; defaults when the file is absent.
pub fn load_config_from(dir: &Path) -> Result<Config> {
    let config_path = dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    load_config_file(&config_path)
}

/// Load an explicitly named configuration file, which must exist.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config.validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
