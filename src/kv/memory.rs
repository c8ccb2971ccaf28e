//! 进程内键值存储
//!
//! 基于 `DashMap` 的并发映射，过期条目在读取时被动清除。

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use super::{KvResult, KvStore, PutOptions};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    /// `None` 表示 TTL 超出时钟范围，条目不过期
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// 内存存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, StoredValue>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前条目数（包含尚未清除的过期条目）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 键是否存在且未过期
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(Instant::now()))
            .unwrap_or(false)
    }

    /// 清除所有过期条目，返回清除数量
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        // 读锁释放后再删除，避免死锁
        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
            tracing::trace!("内存存储条目已过期: {}", key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, options: PutOptions) -> KvResult<()> {
        let expires_at = Instant::now().checked_add(options.expiration_ttl);
        self.entries
            .insert(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryKvStore::new();
        store
            .put("k", "v".to_string(), PutOptions::with_ttl(Duration::from_secs(10)))
            .await
            .unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_replaces_whole_entry() {
        let store = MemoryKvStore::new();
        store
            .put("k", "old".to_string(), PutOptions::with_ttl(Duration::from_secs(5)))
            .await
            .unwrap();
        store
            .put("k", "new".to_string(), PutOptions::with_ttl(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_never_expires() {
        let store = MemoryKvStore::new();
        store
            .put("k", "v".to_string(), PutOptions::with_ttl(Duration::MAX))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_expired() {
        let store = MemoryKvStore::new();
        store
            .put("short", "1".to_string(), PutOptions::with_ttl(Duration::from_secs(1)))
            .await
            .unwrap();
        store
            .put("long", "2".to_string(), PutOptions::with_ttl(Duration::from_secs(100)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("long"));
    }
}
