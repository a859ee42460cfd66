//! Single-entry payload cache
//!
//! The cache holds exactly one blob: the last successful upstream response,
//! byte for byte. Freshness is judged from the moment the blob was written,
//! never from anything inside it.
//!
//! - [`Store::get_fresh`] answers only while the entry is younger than a TTL
//! - [`Store::get`] answers with whatever is stored, used as a fallback
//! - [`Store::load`] also tells a missing entry apart from an unreadable one

pub mod file;
pub mod memory;

use std::fmt;
use std::fmt::Display;
use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A stored payload and how long ago it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload: Bytes,
    pub age: Duration,
}

impl CacheEntry {
    pub fn age_secs(&self) -> u64 {
        self.age.as_secs()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age < ttl
    }
}

/// Why no entry could be produced
#[derive(Debug)]
pub enum CacheError {
    /// Nothing has ever been written
    Missing,

    /// The entry exists but holds zero bytes
    Empty,

    /// The entry exists but could not be read
    Unreadable(std::io::Error),
}

impl std::error::Error for CacheError {}

impl Display for CacheError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CacheError::Missing => "cache entry missing".fmt(fmt),
            CacheError::Empty => "cache entry empty".fmt(fmt),
            CacheError::Unreadable(e) => write!(fmt, "cache entry unreadable: {}", e),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self) -> Result<CacheEntry, CacheError>;

    /// Replaces the stored entry. Readers see either the old or the new
    /// payload, never a mix.
    async fn put(&self, payload: Bytes) -> crate::Result<()>;

    /// Whatever is stored, regardless of age
    async fn get(&self) -> Option<CacheEntry> {
        match self.load().await {
            Ok(entry) => Some(entry),
            Err(CacheError::Missing) => None,
            Err(e) => {
                tracing::warn!("ignoring cache entry: {}", e);
                None
            }
        }
    }

    /// The stored entry only while it is younger than `ttl`
    async fn get_fresh(&self, ttl: Duration) -> Option<CacheEntry> {
        self.get().await.filter(|entry| entry.is_fresh(ttl))
    }
}
