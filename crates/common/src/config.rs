//! Application configuration.
//!
//! Only ambient settings live here. The encode profile, the per-invocation
//! timeout and the final output name are fixed and deliberately absent.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SplitcatError, SplitcatResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitcatConfig {
    /// Transcoder executable, resolved on `PATH` when not absolute.
    pub ffmpeg_path: PathBuf,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "splitcat_transcode=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for SplitcatConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl SplitcatConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// Called before logging is up, so problems are returned alongside the
    /// config for the caller to report once a subscriber exists.
    pub fn load() -> (Self, Option<SplitcatError>) {
        let config_path = config_file_path();
        if !config_path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from(&config_path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from an explicit JSON file.
    pub fn load_from(path: &Path) -> SplitcatResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SplitcatError::io_at("read config", path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| SplitcatError::config(format!("{}: {e}", path.display())))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("movie-splitcat").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "logging": { "json": true } }"#).unwrap();

        let config = SplitcatConfig::load_from(&path).unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_custom_ffmpeg_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ffmpeg_path": "/opt/ffmpeg/bin/ffmpeg" }"#).unwrap();

        let config = SplitcatConfig::load_from(&path).unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SplitcatConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SplitcatError::Config { .. }));
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SplitcatConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SplitcatError::Io { .. }));
    }
}
