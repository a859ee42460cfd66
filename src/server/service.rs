//! Cache-then-upstream status flow shared by every endpoint kind
//!
//! ```text
//!  request ──► fresh cache? ──yes──► respond from cache
//!                  │no
//!                  ▼
//!           refresh lock (one upstream call at a time)
//!                  │
//!                  ▼
//!            fetch upstream ──ok──► write cache, respond live
//!                  │failed
//!                  ▼
//!            any cache? ──yes──► respond from cache, marked stale
//!                  │no
//!                  ▼
//!             error response
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use bytes::Bytes;
use tokio::sync::Mutex;
use crate::analyzer::{analyze, Locale, OverallStatus, Payload};
use crate::cache::{CacheEntry, CacheError, Store};
use crate::server::config::Config;
use crate::server::error::ApiError;
use crate::server::models::{CacheInfo, StatusResponse};
use crate::upstream::{Fetch, MonitorsRequest, UpstreamError};

/// Outcome of a refresh attempt that produced data
enum Refresh {
    /// Fetched from upstream just now
    Live { raw: Bytes, payload: Payload },
    /// Another request refreshed the cache while this one waited
    Cached { entry: CacheEntry, payload: Payload },
}

/// Most recent upstream failure and the request body that caused it
struct Failure {
    at: Instant,
    body: Bytes,
    error: UpstreamError,
}

#[derive(Default)]
struct RefreshState {
    last_failure: Option<Failure>,
}

pub struct StatusService {
    store: Arc<dyn Store>,
    fetcher: Arc<dyn Fetch>,
    locale: Locale,
    ttl: Duration,
    stale_threshold: Duration,
    /// Upstream request body used by `api` endpoints
    api_request: Bytes,
    refresh: Mutex<RefreshState>,
}

impl StatusService {
    pub fn new(
        config: &Config,
        store: Arc<dyn Store>,
        fetcher: Arc<dyn Fetch>,
    ) -> crate::Result<Self> {
        let api_request = MonitorsRequest::new(
            &config.upstream.api_key,
            &config.upstream.custom_uptime_ranges,
        )
        .to_body()?;

        Ok(Self {
            store,
            fetcher,
            locale: config.display.locale,
            ttl: config.cache.ttl(),
            stale_threshold: Duration::from_secs(config.cache.stale_threshold_secs),
            api_request,
            refresh: Mutex::new(RefreshState::default()),
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Raw pass-through: the client supplies the upstream request body and
    /// gets the provider's payload back untouched.
    pub async fn proxy(&self, body: Bytes) -> Result<Bytes, ApiError> {
        if let Some(entry) = self.store.get_fresh(self.ttl).await {
            tracing::debug!("proxy: fresh cache hit ({}s old)", entry.age_secs());
            return Ok(entry.payload);
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::EmptyRequestBody);
        }

        match self.refresh(body).await {
            Ok(Refresh::Live { raw, .. }) => Ok(raw),
            Ok(Refresh::Cached { entry, .. }) => Ok(entry.payload),
            Err(e) => {
                tracing::warn!("proxy: {}, falling back to cache", e);
                match self.store.get().await {
                    Some(entry) => Ok(entry.payload),
                    None => Err(ApiError::Upstream(e)),
                }
            }
        }
    }

    /// Analyzed view, refreshed from upstream with the configured key.
    /// Never fails: every outcome has a status-shaped body.
    pub async fn api(&self) -> StatusResponse {
        if let Some((entry, payload)) = self.parsed(self.store.get_fresh(self.ttl).await) {
            tracing::debug!("api: fresh cache hit ({}s old)", entry.age_secs());
            return self.cached_response(&entry, &payload, false);
        }

        match self.refresh(self.api_request.clone()).await {
            Ok(Refresh::Live { payload, .. }) => StatusResponse::live(analyze(&payload, self.locale)),
            Ok(Refresh::Cached { entry, payload }) => self.cached_response(&entry, &payload, false),
            Err(e) => {
                tracing::warn!("api: {}, falling back to cache", e);
                match self.parsed(self.store.get().await) {
                    Some((entry, payload)) => self.cached_response(&entry, &payload, true),
                    None => StatusResponse::without_data(
                        OverallStatus::Error,
                        self.locale.texts().upstream_failed,
                    ),
                }
            }
        }
    }

    /// Analyzed view of whatever is cached, without touching upstream.
    pub async fn check(&self) -> StatusResponse {
        let texts = self.locale.texts();

        let entry = match self.store.load().await {
            Ok(entry) => entry,
            Err(CacheError::Missing) => {
                return StatusResponse::without_data(OverallStatus::Loading, texts.loading);
            }
            Err(e) => {
                tracing::warn!("check: {}", e);
                return StatusResponse::without_data(OverallStatus::Error, texts.cache_unreadable);
            }
        };

        match Payload::parse(&entry.payload) {
            Ok(payload) if payload.monitors.is_some() => {
                self.cached_response(&entry, &payload, false)
            }
            Ok(_) => {
                tracing::warn!("check: cached payload has no monitor list");
                StatusResponse::without_data(OverallStatus::Error, texts.cache_malformed)
            }
            Err(e) => {
                tracing::warn!("check: cached payload is not valid JSON: {}", e);
                StatusResponse::without_data(OverallStatus::Error, texts.cache_malformed)
            }
        }
    }

    /// Runs at most one upstream call at a time. Requests that queued behind
    /// a successful call reuse the cache it wrote. A failure is only reused
    /// by queued requests carrying the same body, since another body (a
    /// different key) may well succeed.
    async fn refresh(&self, body: Bytes) -> Result<Refresh, UpstreamError> {
        let queued_at = Instant::now();
        let mut state = self.refresh.lock().await;

        if let Some((entry, payload)) = self.parsed(self.store.get_fresh(self.ttl).await) {
            tracing::debug!("cache refreshed by a concurrent request");
            return Ok(Refresh::Cached { entry, payload });
        }
        if let Some(failure) = &state.last_failure {
            if failure.at >= queued_at && failure.body == body {
                return Err(failure.error.clone());
            }
        }

        match self.fetch_live(body.clone()).await {
            Ok(refresh) => {
                state.last_failure = None;
                Ok(refresh)
            }
            Err(e) => {
                state.last_failure = Some(Failure {
                    at: Instant::now(),
                    body,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    async fn fetch_live(&self, body: Bytes) -> Result<Refresh, UpstreamError> {
        let raw = self.fetcher.fetch(body).await?;
        // proxy clients get JSON only: a non-JSON body (e.g. format=xml) is
        // refused rather than passed through or cached
        let payload = Payload::parse(&raw).map_err(|e| UpstreamError::Malformed(e.to_string()))?;
        if payload.is_rejection() {
            return Err(UpstreamError::Rejected);
        }

        // a failed write still leaves us with live data to serve
        if let Err(e) = self.store.put(raw.clone()).await {
            tracing::warn!("failed to write cache: {}", e);
        }

        tracing::info!(
            "fetched {} monitors from upstream",
            payload.monitors.as_ref().map_or(0, Vec::len)
        );
        Ok(Refresh::Live { raw, payload })
    }

    fn parsed(&self, entry: Option<CacheEntry>) -> Option<(CacheEntry, Payload)> {
        let entry = entry?;
        match Payload::parse(&entry.payload) {
            Ok(payload) => Some((entry, payload)),
            Err(e) => {
                tracing::warn!("ignoring unparsable cache entry: {}", e);
                None
            }
        }
    }

    fn cached_response(&self, entry: &CacheEntry, payload: &Payload, fallback: bool) -> StatusResponse {
        let texts = self.locale.texts();
        let mut report = analyze(payload, self.locale);
        let outdated = entry.age > self.stale_threshold;

        if fallback {
            report.message.push_str(texts.using_cached_suffix);
        }
        if outdated {
            report.message.push_str(texts.may_be_outdated_suffix);
        }

        let age = entry.age_secs();
        StatusResponse {
            report,
            cached: true,
            cache_age: Some(age),
            cache: Some(CacheInfo {
                age,
                age_text: texts.age(age),
                stale: outdated,
            }),
            stale: fallback || outdated,
        }
    }
}
