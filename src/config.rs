//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Verification API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the verification API. Required; there is no default.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_media_timeout")]
    pub media_timeout_secs: u64,

    /// 0 disables the text-query deadline
    #[serde(default = "default_text_timeout")]
    pub text_timeout_secs: u64,

    /// Show text-query failures to the user instead of only logging them
    #[serde(default)]
    pub surface_text_errors: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_media_timeout() -> u64 {
    45
}

fn default_text_timeout() -> u64 {
    45
}

fn default_user_agent() -> String {
    format!("fairgpt/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            media_timeout_secs: default_media_timeout(),
            text_timeout_secs: default_text_timeout(),
            surface_text_errors: false,
            user_agent: default_user_agent(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// A config file that exists but cannot be read or parsed is logged and
    /// skipped. Use [`Config::try_load_default`] to surface that instead.
    pub fn load_default() -> Self {
        let mut remaining = Self::default_paths();
        loop {
            match Self::load_first(&remaining) {
                Ok(Some((path, config))) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return config;
                }
                Ok(None) => break,
                Err((path, e)) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    remaining.retain(|p| p != &path);
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Load from the first default location that exists, failing if that
    /// file is unreadable or malformed. Falls back to the environment when
    /// no file exists.
    pub fn try_load_default() -> Result<Self, ConfigError> {
        match Self::load_first(&Self::default_paths()) {
            Ok(Some((_, config))) => Ok(config),
            Ok(None) => Ok(Self::from_env()),
            Err((_, e)) => Err(e),
        }
    }

    fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("fairgpt").join("config.toml")),
            Some(PathBuf::from("/etc/fairgpt/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the first existing path in `paths`, with env overrides
    fn load_first(paths: &[PathBuf]) -> Result<Option<(PathBuf, Self)>, (PathBuf, ConfigError)> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => Self::load_with_env(path)
                .map(|config| Some((path.clone(), config)))
                .map_err(|e| (path.clone(), e)),
            None => Ok(None),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // PUBLIC_API_URL is what the web dashboard's deployments already set.
        if let Some(url) = var("FAIRGPT_API_URL").or_else(|| var("PUBLIC_API_URL")) {
            self.api.base_url = url;
        }
        if let Some(secs) = var("FAIRGPT_MEDIA_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.api.media_timeout_secs = secs;
        }
        if let Some(secs) = var("FAIRGPT_TEXT_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.api.text_timeout_secs = secs;
        }

        if let Some(level) = var("FAIRGPT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("FAIRGPT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# FairGPT Configuration
#
# Environment variables override these settings:
# - FAIRGPT_API_URL (falls back to PUBLIC_API_URL)
# - FAIRGPT_MEDIA_TIMEOUT_SECS
# - FAIRGPT_TEXT_TIMEOUT_SECS
# - FAIRGPT_LOG_LEVEL
# - FAIRGPT_LOG_FORMAT

[api]
# Base URL of the verification API (required)
base_url = ""

# Deadline for image/PDF verification (seconds, 0 = use the 45 second default)
media_timeout_secs = 45

# Deadline for text claims (seconds, 0 = no deadline)
text_timeout_secs = 45

# Show text-claim failures instead of only logging them
surface_text_errors = false

# User-Agent header sent with every request
# user_agent = "fairgpt/<version>"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/fairgpt/fairgpt.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.api.base_url.is_empty());
        assert_eq!(config.api.media_timeout_secs, 45);
        assert!(!config.api.surface_text_errors);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.text_timeout_secs, 45);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_config_documents_every_api_key() {
        let template = generate_default_config();
        for key in [
            "base_url",
            "media_timeout_secs",
            "text_timeout_secs",
            "surface_text_errors",
            "user_agent",
        ] {
            assert!(template.contains(key), "missing {}", key);
        }
        assert!(template.contains("0 = use the 45 second default"));
        assert!(template.contains("0 = no deadline"));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://api.local\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "http://api.local");
        assert_eq!(config.api.media_timeout_secs, 45);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[api\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_first_existing_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        std::fs::write(&first, "[logging]\nlevel = \"debug\"\n").unwrap();
        std::fs::write(&second, "[logging]\nlevel = \"trace\"\n").unwrap();

        let (path, config) = Config::load_first(&[missing, first.clone(), second])
            .unwrap()
            .unwrap();
        assert_eq!(path, first);
        assert_eq!(config.logging.level, "debug");

        assert!(Config::load_first(&[dir.path().join("nope.toml")])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_default_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("config.toml");
        std::fs::write(&bad, "[api\nbase_url = \"http://x\"\n").unwrap();

        match Config::load_first(&[bad.clone()]) {
            Err((path, ConfigError::Parse { .. })) => assert_eq!(path, bad),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PUBLIC_API_URL", "http://public"),
            ("FAIRGPT_MEDIA_TIMEOUT_SECS", "10"),
            ("FAIRGPT_TEXT_TIMEOUT_SECS", "not-a-number"),
            ("FAIRGPT_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://public");
        assert_eq!(config.api.media_timeout_secs, 10);
        assert_eq!(config.api.text_timeout_secs, 45);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_primary_url_wins() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "FAIRGPT_API_URL" => Some("http://primary".to_string()),
            "PUBLIC_API_URL" => Some("http://public".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://primary");
    }
}
