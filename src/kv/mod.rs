//! 键值存储抽象
//!
//! 提供按字符串键读写、带过期时间的外部存储接口，以及添加命名空间前缀的
//! `KvNamespace` 包装。

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use memory::MemoryKvStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisKvStore;

/// 存储层错误
#[derive(Error, Debug)]
pub enum KvError {
    #[error("存储不可用: {0}")]
    Unavailable(String),

    #[error("缓存数据损坏 (键 {key}): {message}")]
    Corrupt { key: String, message: String },

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type KvResult<T> = Result<T, KvError>;

/// 写入选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOptions {
    /// 条目存活时间
    pub expiration_ttl: Duration,
}

impl PutOptions {
    pub fn with_ttl(expiration_ttl: Duration) -> Self {
        Self { expiration_ttl }
    }
}

/// 键值存储后端
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 后端名称，用于日志与健康检查
    fn name(&self) -> &'static str;

    /// 读取原始文本值，过期或不存在时返回 `None`
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// 写入原始文本值，整体替换已有条目
    async fn put(&self, key: &str, value: String, options: PutOptions) -> KvResult<()>;
}

/// 带键前缀的存储视图
#[derive(Clone)]
pub struct KvNamespace {
    store: Arc<dyn KvStore>,
    prefix: String,
}

impl KvNamespace {
    pub fn new(store: Arc<dyn KvStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// 存储后端名称
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }

    pub async fn get_text(&self, key: &str) -> KvResult<Option<String>> {
        self.store.get(&self.full_key(key)).await
    }

    /// 读取并反序列化 JSON 值，无法解析时返回 `KvError::Corrupt`
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> KvResult<Option<T>> {
        match self.get_text(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| KvError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: PutOptions,
    ) -> KvResult<()> {
        let serialized = serde_json::to_string(value)?;
        self.store.put(&self.full_key(key), serialized, options).await
    }

    pub async fn put_text(&self, key: &str, value: String, options: PutOptions) -> KvResult<()> {
        self.store.put(&self.full_key(key), value, options).await
    }
}
