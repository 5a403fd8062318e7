//! Configuration for rulecrawl.
//!
//! Settings come from a TOML (or JSON) file. Discovery order is an explicit
//! path, then a `rulecrawl` config found by `prefer` in the standard
//! locations, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{EngineOptions, DEFAULT_PAGE_SIZE};

/// Name config discovery searches for (`rulecrawl.toml`, `rulecrawl.json`, ...).
pub const APP_NAME: &str = "rulecrawl";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// User agent configuration.
    /// - None: rulecrawl user agent
    /// - "impersonate": a real browser user agent
    /// - any other string: used verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Rules file, relative paths resolve from the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,
    /// Ceiling on content pages per chapter. Unset means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_content_pages: Option<u32>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rules_path: None,
            max_content_pages: None,
            page_size: DEFAULT_PAGE_SIZE,
            source_path: None,
        }
    }
}

/// Where to look for configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration following the discovery order.
    ///
    /// An explicit path must load. Otherwise the prefer crate discovers
    /// rulecrawl config files in the standard locations; a discovered file
    /// that fails to parse falls back to defaults with a warning.
    pub async fn load(options: &LoadOptions) -> Result<Self, String> {
        if let Some(ref path) = options.config_path {
            return Self::load_from_path(path).await;
        }

        let discovered = match prefer::load(APP_NAME).await {
            Ok(pref_config) => pref_config.source_path().map(|p| p.to_path_buf()),
            Err(_) => None,
        };
        let Some(path) = discovered else {
            return Ok(Self::default());
        };

        tracing::debug!("Discovered config at {}", path.display());
        match Self::load_from_path(&path).await {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file. The extension picks the format.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let mut config: Config = match ext {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
            _ => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Directory relative paths are resolved from.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// The rules file to use, preferring an explicit override.
    pub fn rules_path(&self, cli_override: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_override {
            return Some(path.to_path_buf());
        }

        let path = self.rules_path.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        Some(match self.base_dir() {
            Some(base) => base.join(path),
            None => path.clone(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            page_size: self.page_size,
            max_content_pages: self.max_content_pages,
        }
    }
}
