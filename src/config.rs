// Console credentials loaded from a local JSON file. The file is read once
// at startup and the resulting `Config` is never mutated afterwards.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default location of the credentials file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Backend URL and API credentials for one console organization.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub backend: String,
    pub api_id: String,
    pub api_key: String,
    pub org_key: String,
}

impl Config {
    /// Parse a config from its JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config file")
    }
}

/// Read and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    Config::from_json(&content)
}
