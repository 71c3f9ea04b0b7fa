//! Configuration for the feedstore data directory.
//!
//! Resolution sources (highest priority first):
//! 1. Environment variable (FEEDSTORE_DATA)
//! 2. Config file (.feedstore/config.yaml)
//! 3. Default (~/.feedstore/data)
//!
//! Config file discovery:
//! - Searches current directory and parents for .feedstore/config.yaml
//! - The data path in the config file is relative to the config file's
//!   parent directory

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Data directory (relative to the config file's project root)
    pub data: Option<String>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".feedstore").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Resolve the data directory from all sources.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(env_dir) = std::env::var("FEEDSTORE_DATA") {
        return Ok(PathBuf::from(env_dir));
    }

    if let Some(config_path) = find_config_file() {
        let config = load_config_file(&config_path)?;
        if let Some(ref data_path) = config.paths.data {
            // Base directory is the parent of .feedstore/ (the project root)
            let base_dir = config_path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."));
            return Ok(resolve_path(base_dir, data_path));
        }
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".feedstore").join("data"))
}
