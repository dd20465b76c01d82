use std::path::{Path, PathBuf};

use anyhow::Context;
use prismbreak_discovery::DEFAULT_MEDIA_LIMIT;
use prismbreak_session::AuthConfig;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct PrismConfig {
    /// Ingestion/search backend.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Local file discovery.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Accounts and federated sign-in.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl PrismConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Backend connection settings.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Bearer token sent with every request.
    ///
    /// Wrapped in [`SecretString`] so it is redacted in logs.
    pub api_key: Option<SecretString>,
    /// Project every upload is attached to.
    pub project_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
            api_key: None,
            project_id: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000".to_owned()
}

fn default_timeout() -> u64 {
    30
}

/// Media library settings.
#[derive(Debug, Deserialize)]
pub struct DiscoveryConfig {
    /// Directory scanned as the photo library.
    pub media_root: Option<PathBuf>,
    /// Maximum number of photos returned by a scan.
    #[serde(default = "default_media_limit")]
    pub media_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            media_root: None,
            media_limit: default_media_limit(),
        }
    }
}

fn default_media_limit() -> usize {
    DEFAULT_MEDIA_LIMIT
}
