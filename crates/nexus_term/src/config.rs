//! Config file location and contents.
//!
//! Locations:
//! - Linux: ~/.config/nexus_chat/config.json
//! - Windows: %APPDATA%\nexus_chat\config.json
//! - MacOS: ~/Library/Application Support/nexus_chat/config.json

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nexus_chat::context::ContextPreferences;
use nexus_chat::session::Endpoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self {
            config_dir: base.join("nexus_chat"),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub context: ContextPreferences,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            secure: false,
            context: ContextPreferences::default(),
        }
    }
}

impl TermConfig {
    /// Load `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.secure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TermConfig::load_or_default(&dir.path().join("config.json")).unwrap();
        assert_eq!(cfg, TermConfig::default());
        assert_eq!(cfg.endpoint().scheme(), "ws");
    }

    #[test]
    fn partial_file_is_merged_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            json!({"secure": true, "context": {"energy_constraints": {"max_joules": 2}}}).to_string(),
        )
        .unwrap();

        let cfg = TermConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert!(cfg.secure);
        assert_eq!(cfg.context.energy_constraints["max_joules"], 2);
        assert_eq!(cfg.context.cost_limits, json!({}));
    }

    #[test]
    fn invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ host: ").unwrap();
        let err = TermConfig::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
