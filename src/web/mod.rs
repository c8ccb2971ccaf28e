//! Web 服务器模块
//!
//! 基于 axum 的 HTTP 层：语言检测、查询参数校验、错误到状态码的映射。

pub mod config;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod routes;
pub mod types;

pub use config::*;
pub use error::{ApiError, ServerError};
pub use locale::RequestLocale;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::kv::{KvStore, MemoryKvStore};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// 选择存储后端，Redis 不可用时退回内存存储
    async fn open_store(&self) -> Arc<dyn KvStore> {
        match open_redis(self.config.redis_url.as_deref()).await {
            Some(store) => store,
            None => Arc::new(MemoryKvStore::new()),
        }
    }

    /// 启动 Web 服务器，收到 Ctrl+C 后优雅退出
    pub async fn start(&self) -> Result<(), ServerError> {
        self.config.validate()?;

        let store = self.open_store().await;
        tracing::info!("缓存存储: {}", store.name());

        let app_state = Arc::new(AppState::build(&self.config, store)?);
        let app = create_router(app_state, &self.config.cors_origins);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address()).await?;
        tracing::info!("Spark API 启动于 http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Spark API 已停止");
        Ok(())
    }
}

#[cfg(feature = "redis")]
async fn open_redis(url: Option<&str>) -> Option<Arc<dyn KvStore>> {
    let url = url?;
    match crate::kv::RedisKvStore::connect(url).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!("Redis 连接失败: {}", e);
            tracing::warn!("继续运行，使用内存存储");
            None
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn open_redis(url: Option<&str>) -> Option<Arc<dyn KvStore>> {
    if url.is_some() {
        tracing::warn!("未启用 redis 特性，忽略 SPARK_REDIS_URL，使用内存存储");
    }
    None
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听关闭信号: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到关闭信号，正在停止服务");
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 源: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any)
}

/// 创建完整的应用路由（含 CORS 与请求追踪）
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}
