//! HTTP API response models

use serde::Serialize;
use crate::analyzer::{OverallStatus, StatusReport};

/// Analyzed status response
///
/// The analyzer's fields are inlined, followed by where the data came from.
#[derive(Serialize, Debug, Clone)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub report: StatusReport,
    /// Served from the cache rather than a live upstream call
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheInfo>,
    /// Live data was wanted but unavailable, or the cache is past the
    /// staleness threshold
    pub stale: bool,
}

/// Cache metadata attached to responses built from cached data
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub age: u64,
    pub age_text: String,
    pub stale: bool,
}

impl StatusResponse {
    pub fn live(report: StatusReport) -> Self {
        Self {
            report,
            cached: false,
            cache_age: None,
            cache: None,
            stale: false,
        }
    }

    /// Fixed-shape body for outcomes that have no monitor data to show
    pub fn without_data(status: OverallStatus, message: impl Into<String>) -> Self {
        Self::live(StatusReport::empty(status, message))
    }
}
