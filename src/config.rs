use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".markup-scanner.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from .markup-scanner.toml.
/// Every field has a default, so the tool works with no file at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub scan: ScanConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout covering connect, headers and body
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Base URL of the GitHub REST API
    pub api_base: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("markup-scanner/", env!("CARGO_PKG_VERSION")).to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of file downloads kept in flight
    pub concurrency: usize,
    /// Abort the run on the first file that cannot be fetched
    pub fail_fast: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fail_fast: false,
        }
    }
}

/// Repository and search string used when the command line supplies neither.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub repo_url: String,
    pub search: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/ARGOeu/argo-messaging".to_string(),
            search: "api.eu.badgr.io".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from .markup-scanner.toml in the
    /// current directory when no path is given.
    /// A missing default file yields `Config::default()`; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be greater than 0".to_string()));
        }
        if self.scan.concurrency == 0 {
            return Err(ConfigError::Invalid("scan.concurrency must be at least 1".to_string()));
        }
        if self.defaults.search.is_empty() {
            return Err(ConfigError::Invalid("defaults.search must not be empty".to_string()));
        }
        Ok(())
    }
}
