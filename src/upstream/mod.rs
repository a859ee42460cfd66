//! Uptime provider access
//!
//! One POST to the provider's `getMonitors` endpoint per refresh, bounded by
//! a connect and a total timeout. No retries: callers fall back to the cache.

pub mod client;

use std::fmt;
use std::fmt::Display;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

pub use client::UptimeRobotClient;

/// Upstream failure modes, all recovered by serving cached data if any
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, TLS error or timeout
    Transport(String),

    /// Provider answered with a status outside 2xx
    Http(u16),

    /// Provider answered 2xx with no body
    EmptyBody,

    /// Body is not a JSON object the analyzer can read
    Malformed(String),

    /// Provider refused the request (`"stat": "fail"`), e.g. a bad API key
    Rejected,

    /// The blocking request task died
    Internal(String),
}

impl UpstreamError {
    /// Short machine-readable tag reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Http(_) => "http_status",
            UpstreamError::EmptyBody => "empty_body",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::Rejected => "rejected",
            UpstreamError::Internal(_) => "internal",
        }
    }
}

impl std::error::Error for UpstreamError {}

impl Display for UpstreamError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UpstreamError::Transport(e) => write!(fmt, "transport error: {}", e),
            UpstreamError::Http(status) => write!(fmt, "upstream returned HTTP {}", status),
            UpstreamError::EmptyBody => "upstream returned an empty body".fmt(fmt),
            UpstreamError::Malformed(e) => write!(fmt, "upstream body malformed: {}", e),
            UpstreamError::Rejected => "upstream rejected the request".fmt(fmt),
            UpstreamError::Internal(e) => write!(fmt, "upstream task failed: {}", e),
        }
    }
}

/// Something that can fetch a raw monitor list
#[async_trait]
pub trait Fetch: Send + Sync {
    /// POSTs `body` as JSON and returns the raw response body on 2xx.
    async fn fetch(&self, body: Bytes) -> Result<Bytes, UpstreamError>;
}

/// Request body for the provider, built from configuration
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonitorsRequest {
    pub api_key: String,
    pub format: &'static str,
    pub logs: u8,
    pub response_times: u8,
    pub custom_uptime_ranges: String,
}

impl MonitorsRequest {
    pub fn new(api_key: &str, custom_uptime_ranges: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            format: "json",
            logs: 1,
            response_times: 1,
            custom_uptime_ranges: custom_uptime_ranges.to_string(),
        }
    }

    pub fn to_body(&self) -> crate::Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}
