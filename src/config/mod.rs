use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::MAX_CATALOG_BATCH;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub store: StoreConfig,
    pub index: IndexConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub lookup_url: String,
    pub rss_base_url: String,
    pub default_country: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub host: String,
    pub index: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lookup_url: "http://itunes.apple.com/lookup".to_string(),
            rss_base_url: "https://itunes.apple.com".to_string(),
            default_country: "de".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:9200".to_string(),
            index: "dioscope".to_string(),
            max_results: MAX_CATALOG_BATCH,
            timeout_secs: 30,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("dioscope-scheduler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl IndexConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Requested batch size, never above the per-run cap
    pub fn batch_size(&self) -> usize {
        self.max_results.min(MAX_CATALOG_BATCH)
    }
}

impl Config {
    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
