//! TOML configuration.
//!
//! ```toml
//! active = "/abs/path/to/insights.tar.gz"
//!
//! [logging]
//! level = "warn"
//!
//! [extract]
//! infer_type_meta = true
//! ```
//!
//! Every field is optional. A missing file is the default configuration,
//! so the first `ilens use` can create it.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging;
use crate::scan::ExtractOptions;

/// Directory under `$HOME` holding the config file.
pub const CONFIG_DIR: &str = ".insights-lens";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Archive used when `--insights-file` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractConfig {
    #[serde(default = "default_infer_type_meta")]
    pub infer_type_meta: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            infer_type_meta: default_infer_type_meta(),
        }
    }
}

fn default_infer_type_meta() -> bool {
    true
}

impl ExtractConfig {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            infer_type_meta: self.infer_type_meta,
        }
    }
}

impl Config {
    /// The archive to query: `flag` if given, else the active archive.
    pub fn resolve_archive(&self, flag: Option<&Path>) -> Result<PathBuf> {
        match (flag, &self.active) {
            (Some(path), _) => Ok(path.to_path_buf()),
            (None, Some(active)) => Ok(active.clone()),
            (None, None) => bail!(
                "no insights archive selected; pass --insights-file or run `ilens use <archive>`"
            ),
        }
    }
}

/// `$HOME/.insights-lens/config.toml`, or a relative path without `$HOME`.
pub fn default_config_path() -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default();
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    // Validate logging
    if logging::parse_level(&config.logging.level).is_none() {
        bail!(
            "Unknown logging.level: '{}'. Must be one of trace, debug, info, warn, error, or off.",
            config.logging.level
        );
    }

    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
