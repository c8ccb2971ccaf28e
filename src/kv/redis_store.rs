//! Redis 键值存储
//!
//! 使用多路复用异步连接，写入时通过 `SET key value EX ttl` 设置过期时间，
//! 过期由 Redis 负责。

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError};

use super::{KvError, KvResult, KvStore, PutOptions};

impl From<RedisError> for KvError {
    fn from(err: RedisError) -> Self {
        KvError::Unavailable(err.to_string())
    }
}

/// Redis 存储后端
#[derive(Clone)]
pub struct RedisKvStore {
    connection: MultiplexedConnection,
}

impl RedisKvStore {
    /// 连接 Redis 并验证连通性
    pub async fn connect(url: &str) -> KvResult<Self> {
        let client = Client::open(url)?;
        let connection = client.get_multiplexed_tokio_connection().await?;
        let store = Self { connection };
        store.ping().await?;
        tracing::info!("已连接 Redis: {}", url);
        Ok(store)
    }

    /// 测试 Redis 连接
    pub async fn ping(&self) -> KvResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String, options: PutOptions) -> KvResult<()> {
        let mut conn = self.connection.clone();
        // EX 只接受正整数秒
        let ttl = options.expiration_ttl.as_secs().max(1);
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
