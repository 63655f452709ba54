//! Client configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::context::{TreeContext, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::error::ConfigError;

/// Environment variable that overrides the configured base URL.
pub const BACKEND_URL_ENV: &str = "QLIQ_BACKEND_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://192.168.8.8:8000/api";

/// Settings read at startup by the composition root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `https://shop.example.com/api`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Nesting ceiling for referral trees
    pub max_tree_depth: usize,

    /// Where to keep the bearer token; defaults to the platform config dir
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            max_tree_depth: DEFAULT_MAX_DEPTH,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from file, then apply the environment override.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str::<ClientConfig>(&contents)?
        } else {
            ClientConfig::default()
        };

        let config = config.with_base_url_override(std::env::var(BACKEND_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("qliq").join("config.toml"))
    }

    /// Replace `base_url` when `url` is a non-blank value.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Check that `base_url` is an absolute URL and `max_tree_depth` is within
    /// [`MAX_DEPTH_LIMIT`].
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.max_tree_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::TreeDepth {
                value: self.max_tree_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Tree limits derived from this configuration.
    pub fn tree_context(&self) -> TreeContext {
        TreeContext::with_max_depth(self.max_tree_depth)
    }
}
