//! Configuration file handling for the CLI
//!
//! Settings live in `<config dir>/ngrok-ctl/config.toml` under a `[session]`
//! table. Command-line flags win over the file, the file wins over defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ngrok_api::SessionConfig;

/// On-disk configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub session: SessionConfig,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    /// Apply non-empty overrides on top of a session config
    pub fn apply(&self, config: &mut SessionConfig) {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
    }
}

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ngrok-ctl")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load an explicit config file, or the default one if it exists
///
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
pub fn resolve_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                load_config(&default_path)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Save configuration to a file
pub fn save_config(path: &Path, config: &ConfigFile) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ConfigFile::default();
        config.session.api_url = "http://localhost:4041/".to_string();
        config.session.timeout = Some(Duration::from_secs(10));
        config.session.headers = Some(BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]));

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nconnect_timeout = 2\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.session.api_url, ngrok_api::DEFAULT_API_URL);
        assert_eq!(config.session.connect_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = SessionConfig::default();
        Overrides {
            api_url: Some("http://10.0.0.2:4040".to_string()),
            timeout_secs: Some(7),
        }
        .apply(&mut config);

        assert_eq!(config.api_url, "http://10.0.0.2:4040");
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));

        let mut config = SessionConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config, SessionConfig::default());
    }
}
