//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\songspot\config.toml
//! - macOS: ~/Library/Application Support/songspot/config.toml
//! - Linux: ~/.config/songspot/config.toml
//!
//! Provider credentials may also come from `ACRCLOUD_HOST`,
//! `ACRCLOUD_ACCESS_KEY` and `ACRCLOUD_ACCESS_SECRET` (a `.env` file in the
//! working directory is loaded at startup). Those are applied on top of the
//! file by the CLI layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::recognition::ProviderCredentials;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider credentials (only the relay needs these)
    pub credentials: Credentials,

    /// Relay server settings
    pub server: ServerConfig,

    /// Capture client settings
    pub capture: CaptureConfig,
}

/// Provider credentials. Any of them may be missing; the relay reports
/// which ones on each request.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Provider host, e.g. `identify-eu-west-1.acrcloud.com`
    pub host: Option<String>,
    pub access_key: Option<String>,
    pub access_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("access_secret", &self.access_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Override stored values with any that are given.
    pub fn merge(&mut self, host: Option<&str>, access_key: Option<&str>, access_secret: Option<&str>) {
        if let Some(v) = host {
            self.host = Some(v.to_string());
        }
        if let Some(v) = access_key {
            self.access_key = Some(v.to_string());
        }
        if let Some(v) = access_secret {
            self.access_secret = Some(v.to_string());
        }
    }

    /// Names of the credentials that are unset or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.host) {
            missing.push("host");
        }
        if blank(&self.access_key) {
            missing.push("access_key");
        }
        if blank(&self.access_secret) {
            missing.push("access_secret");
        }
        missing
    }

    /// The full credential set, if every value is present.
    pub fn complete(&self) -> Option<ProviderCredentials> {
        if !self.missing().is_empty() {
            return None;
        }
        Some(ProviderCredentials {
            host: self.host.clone()?,
            access_key: self.access_key.clone()?,
            access_secret: self.access_secret.clone()?,
        })
    }
}

/// Relay server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Directory uploads are staged in while being forwarded
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Capture client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Recording window in seconds
    pub duration_secs: u64,

    /// Base URL of the relay server
    pub relay_url: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            relay_url: "http://localhost:5000".to_string(),
        }
    }
}

impl CaptureConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songspot"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => parse(&contents).unwrap_or_else(|e| {
            tracing::error!("Failed to parse config file {:?}: {}", path, e);
            tracing::warn!("Using default configuration");
            Config::default()
        }),
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Parse configuration from TOML text
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let mut config = Config::default();
        config.credentials.merge(Some("identify.example.com"), None, None);
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(!toml.contains("access_secret"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[capture]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[credentials]
host = "identify-eu-west-1.acrcloud.com"
"#;
        let config = parse(toml).unwrap();

        assert_eq!(
            config.credentials.host.as_deref(),
            Some("identify-eu-west-1.acrcloud.com")
        );
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.server.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.capture.duration(), Duration::from_secs(10));
        assert_eq!(config.capture.relay_url, "http://localhost:5000");
    }

    #[test]
    fn test_missing_credentials() {
        let mut creds = Credentials::default();
        assert_eq!(creds.missing(), vec!["host", "access_key", "access_secret"]);
        assert!(creds.complete().is_none());

        creds.merge(Some("h"), Some("   "), None);
        assert_eq!(creds.missing(), vec!["access_key", "access_secret"]);

        creds.merge(None, Some("k"), Some("s"));
        let complete = creds.complete().unwrap();
        assert_eq!(complete.host, "h");
        assert_eq!(complete.access_key, "k");
        assert_eq!(complete.access_secret, "s");
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let mut creds = Credentials::default();
        creds.merge(None, None, Some("hunter2"));
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn test_save_to_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.capture.duration_secs = 5;
        config.credentials.merge(Some("host.example"), None, None);
        save_to(&config, &path).unwrap();

        let parsed = parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.capture.duration_secs, 5);
        assert_eq!(parsed.credentials.host.as_deref(), Some("host.example"));
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_provider_scheme_is_not_configurable() {
        let config = parse(
            r#"
[server]
bind = "0.0.0.0:5000"
provider_scheme = "http"
"#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5000");

        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(!toml.contains("provider_scheme"));
        assert!(!toml.contains("\"http\""));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(parse("[server\nbind = 1"), Err(ConfigError::Parse(_))));
    }
}
