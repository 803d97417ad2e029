//! Configuration loading for prodscand.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag or `PRODSCAN_CONFIG`)
//! 2. `~/.prodscan/config.toml` (user)
//! 3. `/etc/prodscan/config.toml` (system)
//! 4. built-in defaults
//!
//! The API key is loaded separately:
//! 1. `~/.prodscan/secrets.toml` (user, must be 0600)
//! 2. `/etc/prodscan/secrets.toml` (system, must be 0600)
//! 3. `OPENAI_API_KEY`

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_DIR;
use crate::invoker::DEFAULT_MODEL;
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::scanner::{DEFAULT_PROMPT_PATH, ScannerBuilder};
use crate::{Result, ScannerError};

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted request body in bytes (default: 20 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
    /// Timeout for each model call in seconds (default: 120).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_max_upload() -> usize {
    20 * 1024 * 1024
}

fn default_timeout() -> u64 {
    120
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Model name (default: gpt-5).
    #[serde(default = "default_model")]
    pub model: String,
    /// Result cache directory (default: ./cache).
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Instruction prompt file (default: ./prompt.txt).
    #[serde(default = "default_prompt_path")]
    pub prompt_path: PathBuf,
    /// OpenAI API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            cache_dir: default_cache_dir(),
            prompt_path: default_prompt_path(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_prompt_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROMPT_PATH)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations, falling back to
    /// defaults when no file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Config::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            ScannerError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ScannerError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ScannerError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".prodscan").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/prodscan/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Scanner builder carrying this configuration and the API key, if any.
    pub fn scanner_builder(&self, secrets: &Secrets) -> ScannerBuilder {
        let mut builder = ScannerBuilder::new()
            .model(&self.scanner.model)
            .cache_dir(&self.scanner.cache_dir)
            .prompt_file(&self.scanner.prompt_path)
            .base_url(&self.scanner.base_url)
            .timeout(Duration::from_secs(self.server.limits.request_timeout_secs));

        if let Some(key) = secrets.api_key() {
            builder = builder.openai(key);
        }
        builder
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".prodscan").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/prodscan/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScannerError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ScannerError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Reject secrets files readable by group or others.
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ScannerError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(ScannerError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// OpenAI API key: secrets file first, then `OPENAI_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.openai
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.server.limits.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.server.limits.request_timeout_secs, 120);
        assert_eq!(config.scanner.model, "gpt-5");
        assert_eq!(config.scanner.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.scanner.prompt_path, PathBuf::from("prompt.txt"));
        assert_eq!(config.scanner.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        assert_eq!(config.server.limits.request_timeout_secs, 120);
        assert_eq!(config.scanner.model, "gpt-5");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"

            [server.limits]
            max_upload_bytes = 1048576
            request_timeout_secs = 30

            [scanner]
            model = "gpt-5-mini"
            cache_dir = "/var/cache/prodscan"
            prompt_path = "/etc/prodscan/prompt.txt"
            base_url = "http://localhost:4000/v1"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.limits.max_upload_bytes, 1_048_576);
        assert_eq!(config.server.limits.request_timeout_secs, 30);
        assert_eq!(config.scanner.model, "gpt-5-mini");
        assert_eq!(config.scanner.cache_dir, PathBuf::from("/var/cache/prodscan"));
        assert_eq!(
            config.scanner.prompt_path,
            PathBuf::from("/etc/prodscan/prompt.txt")
        );
        assert_eq!(config.scanner.base_url, "http://localhost:4000/v1");
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [openai]
            api_key = "sk-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.api_key(), Some("sk-test-key".to_string()));
    }

    #[test]
    fn secrets_file_wins_over_environment() {
        let secrets = Secrets {
            openai: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
        };
        assert_eq!(secrets.api_key(), Some("from-file".to_string()));
    }

    #[test]
    fn explicit_config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scanner]\nmodel = \"gpt-5-nano\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.scanner.model, "gpt-5-nano");
        assert_eq!(config.server.address, "127.0.0.1:8000");
    }

    #[test]
    fn malformed_config_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\naddress = 1").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ScannerError::Configuration(_))
        ));
    }

    #[test]
    fn scanner_builder_applies_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            scanner: ScannerConfig {
                model: "gpt-5-mini".to_string(),
                cache_dir: dir.path().join("cache"),
                ..ScannerConfig::default()
            },
            ..Config::default()
        };
        let secrets = Secrets {
            openai: Some(ApiKeySecret {
                api_key: "sk-test".to_string(),
            }),
        };

        let scanner = config.scanner_builder(&secrets).build().unwrap();
        assert_eq!(scanner.model(), "gpt-5-mini");
        assert!(dir.path().join("cache").is_dir());
    }
}
