//! Typed panel configuration

use crate::error::{ConfigError, ConfigResult};
use crate::loader::YamlLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use vam_core::PageSize;

/// File name looked up when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "vam.yaml";

fn default_url() -> String {
    "http://localhost:8123".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> usize {
    PageSize::default().get()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// How to reach the host and how to present the table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelConfig {
    /// Host base URL; http(s) is mapped to ws(s)
    #[serde(default = "default_url")]
    pub url: String,
    /// Long-lived access token
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Bounds connecting and authenticating only; commands wait indefinitely
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: String::new(),
            language: default_language(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl PanelConfig {
    /// Load and validate `file` from `config_dir`
    pub fn load(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = Self::read(config_dir, file)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a single path, splitting it into directory and file name
    pub fn load_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = Self::read_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating, for callers that apply overrides first
    pub fn read(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Self> {
        let loader = YamlLoader::new(config_dir)?;
        let path = loader.config_dir().join(file.as_ref());
        let value = loader.load_file(file)?;
        let config: Self =
            serde_yaml::from_value(value).map_err(|source| ConfigError::ParseYaml {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), url = %config.url, "Read panel configuration");
        Ok(config)
    }

    pub fn read_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file = path.file_name().ok_or_else(|| ConfigError::InvalidValue {
            key: "config".to_string(),
            reason: format!("{} is not a file path", path.display()),
        })?;
        Self::read(dir, file)
    }

    /// Replace the URL and token with command-line values when given
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(token) = token {
            self.token = token;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "token".to_string(),
                reason: "an access token is required".to_string(),
            });
        }
        self.page_size()?;
        Ok(())
    }

    pub fn page_size(&self) -> ConfigResult<PageSize> {
        PageSize::try_from(self.page_size).map_err(|e| ConfigError::InvalidValue {
            key: "page_size".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// WebSocket endpoint derived from the base URL
    pub fn websocket_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{base}/api/websocket")
    }
}
