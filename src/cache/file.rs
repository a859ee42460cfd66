use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use crate::cache::{CacheEntry, CacheError, Store};

/// Cache backed by one JSON file on local disk
///
/// The entry's age is the file's modification time, so the file can be
/// seeded or inspected by hand and still behave consistently.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl Store for FileStore {
    async fn load(&self) -> Result<CacheEntry, CacheError> {
        let metadata = match fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CacheError::Missing),
            Err(e) => return Err(CacheError::Unreadable(e)),
        };

        let payload = fs::read(&self.path).await.map_err(CacheError::Unreadable)?;
        if payload.is_empty() {
            return Err(CacheError::Empty);
        }

        let modified = metadata.modified().map_err(CacheError::Unreadable)?;
        // an mtime in the future reads as "just written"
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();

        Ok(CacheEntry {
            payload: Bytes::from(payload),
            age,
        })
    }

    async fn put(&self, payload: Bytes) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // write to a sibling temp file, then rename over the target
        let temp_path = self.temp_path();
        fs::write(&temp_path, &payload).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("cached {} bytes to {}", payload.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backdate(path: &Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_then_get_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uptime_cache.json"));
        let payload = Bytes::from_static(br#"{"stat":"ok","monitors":[]}"#);

        store.put(payload.clone()).await.unwrap();

        let entry = store.get_fresh(Duration::from_secs(300)).await.unwrap();
        assert_eq!(entry.payload, payload);
        assert!(entry.age < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_expired_entry_still_served_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uptime_cache.json"));
        let payload = Bytes::from_static(br#"{"monitors":[]}"#);
        store.put(payload.clone()).await.unwrap();

        let ttl = Duration::from_secs(300);
        backdate(store.path(), 301);

        assert!(store.get_fresh(ttl).await.is_none());
        let entry = store.get().await.unwrap();
        assert_eq!(entry.payload, payload);
        assert!(entry.age_secs() >= 301);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never_written.json"));

        assert!(matches!(store.load().await, Err(CacheError::Missing)));
        assert!(store.get().await.is_none());
        assert!(store.get_fresh(Duration::from_secs(300)).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uptime_cache.json");
        std::fs::write(&path, b"").unwrap();
        let store = FileStore::new(path);

        assert!(matches!(store.load().await, Err(CacheError::Empty)));
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_content_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uptime_cache.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileStore::new(path);

        let entry = store.get().await.unwrap();
        assert_eq!(&entry.payload[..], b"{ not json");
    }

    #[tokio::test]
    async fn test_put_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/dir/cache.json"));

        store.put(Bytes::from_static(b"{\"v\":1}")).await.unwrap();
        store.put(Bytes::from_static(b"{\"v\":2}")).await.unwrap();

        let entry = store.get().await.unwrap();
        assert_eq!(&entry.payload[..], b"{\"v\":2}");
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_future_mtime_counts_as_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uptime_cache.json"));
        store.put(Bytes::from_static(b"{}")).await.unwrap();

        let file = std::fs::File::options().write(true).open(store.path()).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(3600))
            .unwrap();

        let entry = store.get_fresh(Duration::from_secs(1)).await.unwrap();
        assert_eq!(entry.age, Duration::ZERO);
    }
}
