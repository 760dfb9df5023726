//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::query::PageSize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Repository layout and fetch limits
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Listing defaults
    #[serde(default)]
    pub view: ViewConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = Url::parse(&self.client.base_url) {
            return Err(AppError::config(format!(
                "client.base_url '{}' is not a valid URL: {e}",
                self.client.base_url
            )));
        }
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::config("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::config("client.timeout_secs must be > 0"));
        }
        if self.client.max_concurrent == 0 {
            return Err(AppError::config("client.max_concurrent must be > 0"));
        }
        if self.repository.community_id.trim().is_empty() {
            return Err(AppError::config("repository.community_id is empty"));
        }
        if self.repository.item_limit == 0 {
            return Err(AppError::config("repository.item_limit must be > 0"));
        }
        if PageSize::try_from(self.view.page_size).is_err() {
            return Err(AppError::config(format!(
                "view.page_size {} is not one of 10, 20, 50, 100",
                self.view.page_size
            )));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the REST API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent department fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Repository layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Top-level community whose collections are the departments
    #[serde(default = "defaults::community_id")]
    pub community_id: String,

    /// Maximum items requested per department
    #[serde(default = "defaults::item_limit")]
    pub item_limit: usize,

    /// Literal prefix stripped from department names for display
    #[serde(default = "defaults::department_prefix")]
    pub department_prefix: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            community_id: defaults::community_id(),
            item_limit: defaults::item_limit(),
            department_prefix: defaults::department_prefix(),
        }
    }
}

/// Listing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Records per page; one of 10, 20, 50, 100
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

mod defaults {
    // Client defaults
    pub fn base_url() -> String {
        "http://localhost:8080/rest".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pubdash/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        8
    }

    // Repository defaults
    pub fn community_id() -> String {
        "5".into()
    }
    pub fn item_limit() -> usize {
        10_000
    }
    pub fn department_prefix() -> String {
        "Department of ".into()
    }

    // View defaults
    pub fn page_size() -> usize {
        10
    }
}
