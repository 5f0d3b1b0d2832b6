// 测试用内存存储

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::store::{CacheError, CacheStore};

/// 内存存储，过期判断使用 tokio 时钟，便于在测试中推进时间
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        matches!(self.get(key).await, Ok(Some(_)))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn memory_store_expires_entries() {
        let store = MemoryStore::new();
        store
            .set_ex("k", b"v".to_vec(), Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(store.contains("k").await);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.set_ex("k", b"one".to_vec(), ttl).await.unwrap();
        store.set_ex("k", b"two".to_vec(), ttl).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
    }
}
