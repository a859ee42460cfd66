use std::time::{Duration, Instant};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use crate::cache::{CacheEntry, CacheError, Store};

/// In-process cache with the same semantics as [`FileStore`](super::FileStore)
///
/// Lost on restart. The server binary always uses the file store; this one
/// is for embedding the library and for driving the service in tests with a
/// controlled entry age.
#[derive(Default)]
pub struct MemoryStore {
    entry: RwLock<Option<(Bytes, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an entry that was written `age` ago.
    pub async fn put_with_age(&self, payload: Bytes, age: Duration) {
        let written = Instant::now()
            .checked_sub(age)
            .unwrap_or_else(Instant::now);
        *self.entry.write().await = Some((payload, written));
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<CacheEntry, CacheError> {
        let entry = self.entry.read().await;
        match entry.as_ref() {
            None => Err(CacheError::Missing),
            Some((payload, _)) if payload.is_empty() => Err(CacheError::Empty),
            Some((payload, written)) => Ok(CacheEntry {
                payload: payload.clone(),
                age: written.elapsed(),
            }),
        }
    }

    async fn put(&self, payload: Bytes) -> crate::Result<()> {
        *self.entry.write().await = Some((payload, Instant::now()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        assert!(matches!(store.load().await, Err(CacheError::Missing)));

        store.put(Bytes::from_static(b"{}")).await.unwrap();
        let entry = store.get_fresh(Duration::from_secs(60)).await.unwrap();
        assert_eq!(&entry.payload[..], b"{}");
    }

    #[tokio::test]
    async fn test_aged_entry() {
        let store = MemoryStore::new();
        store
            .put_with_age(Bytes::from_static(b"{}"), Duration::from_secs(120))
            .await;

        assert!(store.get_fresh(Duration::from_secs(60)).await.is_none());
        assert!(store.get().await.unwrap().age_secs() >= 120);
    }
}
