//! 读穿缓存
//!
//! 命中时直接返回缓存值；未命中时调用抓取函数，成功结果写回存储后返回，
//! 失败结果不写入（无负缓存）。损坏的缓存条目按未命中处理，下一次成功写入
//! 时被覆盖。

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::kv::{KvError, KvNamespace, PutOptions};
use crate::providers::{ProviderError, ProviderResult, RemoteSource};

/// 默认缓存时间（15 分钟）
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

/// 缓存统计信息
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub hit_rate: f64,
}

/// 读穿缓存，克隆后共享计数器
#[derive(Clone)]
pub struct ReadThroughCache {
    namespace: KvNamespace,
    counters: Arc<Counters>,
}

impl ReadThroughCache {
    pub fn new(namespace: KvNamespace) -> Self {
        Self {
            namespace,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn namespace(&self) -> &KvNamespace {
        &self.namespace
    }

    /// 先查缓存，未命中时调用 `fetcher` 并写回
    pub async fn fetch_with_cache<T, F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> ProviderResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        if key.trim().is_empty() {
            return Err(ProviderError::InvalidInput("缓存键不能为空".to_string()));
        }
        if ttl.is_zero() {
            return Err(ProviderError::InvalidInput(format!("缓存时间必须大于 0 (键 {})", key)));
        }

        match self.namespace.get_json::<T>(key).await {
            Ok(Some(value)) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("缓存命中: {}", key);
                return Ok(value);
            }
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("缓存未命中: {}", key);
            }
            Err(KvError::Corrupt { message, .. }) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("缓存数据损坏，按未命中处理: {} ({})", key, message);
            }
            Err(e) => {
                tracing::error!("读取缓存失败: {} ({})", key, e);
                return Err(e.into());
            }
        }

        let value = fetcher().await?;

        match self
            .namespace
            .put_json(key, &value, PutOptions::with_ttl(ttl))
            .await
        {
            Ok(()) => {
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("已写入缓存: {} (TTL {}s)", key, ttl.as_secs());
            }
            Err(e) => {
                self.counters.write_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("写入缓存失败，仍返回抓取结果: {} ({})", key, e);
            }
        }

        Ok(value)
    }

    /// 通过数据源读取数据：缓存键与 TTL 来自数据源，未命中时抓取并解析
    pub async fn get_data<S>(&self, source: &S, request: &S::Request) -> ProviderResult<S::Data>
    where
        S: RemoteSource + ?Sized,
    {
        let key = source.cache_key(request);
        let key_ref = key.as_str();
        self.fetch_with_cache(key_ref, source.ttl(), || async move {
            tracing::info!("从上游获取数据: {} ({})", source.name(), key_ref);
            let body = source.fetch(request).await?;
            source.parse(request, &body)
        })
        .await
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            writes: self.counters.writes.load(Ordering::Relaxed),
            write_failures: self.counters.write_failures.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}
