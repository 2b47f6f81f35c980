//! Configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main service configuration
///
/// `[model]` and `[categories]` are required; a file missing either section
/// fails to parse. `[server]` falls back to defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub categories: CategoryConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads
    pub workers: usize,
    /// Upper bound on items accepted by `/classify/batch`
    pub max_batch_items: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            max_batch_items: default_max_batch_items(),
        }
    }
}

/// Location of the pretrained artifact on the Hub and in the local cache
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    /// Hub repository, e.g. "data-silence/fasttext-rus-news-classifier"
    pub repo_id: String,
    /// Artifact file inside the repository
    pub filename: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    #[serde(default = "crate::models::cache::default_cache_dir")]
    pub cache_dir: PathBuf,

    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Alternative Hub endpoint (mirror)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Raw category tables as written in the config file
///
/// Keys of `names` are category ids written as strings, since TOML table keys
/// are always strings. They are parsed by `CategoryTable::from_config`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CategoryConfig {
    pub default_id: u32,
    pub names: BTreeMap<String, String>,
    pub mapping: BTreeMap<String, u32>,
}

impl ServiceConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without applying overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("NEWS_CLASSIFIER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NEWS_CLASSIFIER_PORT") {
            self.server.port = port
                .parse()
                .context("Invalid NEWS_CLASSIFIER_PORT value")?;
        }
        if let Ok(workers) = std::env::var("NEWS_CLASSIFIER_WORKERS") {
            self.server.workers = workers
                .parse()
                .context("Invalid NEWS_CLASSIFIER_WORKERS value")?;
        }
        if let Ok(cache_dir) = std::env::var("NEWS_CLASSIFIER_CACHE_DIR") {
            self.model.cache_dir = PathBuf::from(cache_dir);
        }
        Ok(())
    }

    /// Validate configuration
    ///
    /// Category tables are validated separately when the `CategoryTable` is built.
    pub fn validate(&self) -> Result<()> {
        if self.server.port < 1024 {
            anyhow::bail!("Server port must be >= 1024 (got {})", self.server.port);
        }
        if self.server.host.trim().is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }
        if self.server.workers == 0 {
            anyhow::bail!("Worker count must be at least 1");
        }
        if self.server.max_batch_items == 0 {
            anyhow::bail!("max_batch_items must be at least 1");
        }

        if self.model.repo_id.trim().is_empty() {
            anyhow::bail!("model.repo_id cannot be empty");
        }
        if self.model.filename.trim().is_empty() {
            anyhow::bail!("model.filename cannot be empty");
        }
        if self.model.revision.trim().is_empty() {
            anyhow::bail!("model.revision cannot be empty");
        }
        if self.model.download_timeout_secs == 0 {
            anyhow::bail!("model.download_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
fn default_max_batch_items() -> usize {
    1000
}
fn default_revision() -> String {
    "main".to_string()
}
fn default_download_timeout() -> u64 {
    600
}
