use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::analyzer::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
            endpoints: default_endpoints(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    // listen address: eg: 0.0.0.0:8080
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    // provider getMonitors endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    // read-only API key, only needed by `api` endpoints
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    // whole request, connect included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_custom_uptime_ranges")]
    pub custom_uptime_ranges: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            custom_uptime_ranges: default_custom_uptime_ranges(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_file")]
    pub file: PathBuf,

    // entries younger than this are served without calling upstream
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    // entries older than this are flagged as possibly outdated
    #[serde(default = "default_stale_threshold_secs")]
    pub stale_threshold_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: default_cache_file(),
            ttl_secs: default_ttl_secs(),
            stale_threshold_secs: default_stale_threshold_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
}

/// How an endpoint produces its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// Forwards the client's request body upstream and returns the raw payload
    Proxy,
    /// Builds the upstream request from configuration and returns the analyzed view
    Api,
    /// Never calls upstream; analyzes whatever is cached
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub path: String,
    pub kind: EndpointKind,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_api_url() -> String {
    "https://api.uptimerobot.com/v2/getMonitors".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_custom_uptime_ranges() -> String {
    "1-7-30".to_string()
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("uptime_cache.json")
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_stale_threshold_secs() -> u64 {
    600
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig {
            path: "/status".to_string(),
            kind: EndpointKind::Proxy,
        },
        EndpointConfig {
            path: "/status/api".to_string(),
            kind: EndpointKind::Api,
        },
        EndpointConfig {
            path: "/status/check".to_string(),
            kind: EndpointKind::Check,
        },
    ]
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cache.ttl_secs == 0 {
            anyhow::bail!("cache.ttl_secs must be greater than 0");
        }
        if self.upstream.connect_timeout_secs == 0 || self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream timeouts must be greater than 0");
        }
        if self.upstream.timeout_secs < self.upstream.connect_timeout_secs {
            anyhow::bail!(
                "upstream.timeout_secs ({}) must not be shorter than upstream.connect_timeout_secs ({})",
                self.upstream.timeout_secs,
                self.upstream.connect_timeout_secs
            );
        }

        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if !endpoint.path.starts_with('/') {
                anyhow::bail!("endpoint path must start with '/': {}", endpoint.path);
            }
            // paths are literal; captures and wildcards would make routing panic
            if endpoint.path.split('/').any(|seg| seg.starts_with(':') || seg.starts_with('*')) {
                anyhow::bail!("endpoint path must not contain ':' or '*' segments: {}", endpoint.path);
            }
            if endpoint.path == "/health" {
                anyhow::bail!("endpoint path /health is reserved");
            }
            if !seen.insert(endpoint.path.as_str()) {
                anyhow::bail!("duplicate endpoint path: {}", endpoint.path);
            }
        }

        let needs_key = self.endpoints.iter().any(|e| e.kind == EndpointKind::Api);
        if needs_key && self.upstream.api_key.trim().is_empty() {
            anyhow::bail!("upstream.api_key is required by `api` endpoints");
        }
        Ok(())
    }
}

/// Reads `path` as TOML. A missing file yields the defaults.
pub fn load(path: &str) -> anyhow::Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("config file {} not found, using defaults", path);
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
