//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::WebConfig;
use super::error::ServerError;
use crate::cache::{CacheStats, ReadThroughCache};
use crate::i18n::Translator;
use crate::kv::{KvNamespace, KvStore};
use crate::providers::http::http_client;
use crate::providers::{SteamProvider, TikTokProvider, YoutubeProvider};

/// 应用状态
pub struct AppState {
    pub translator: Arc<Translator>,
    pub cache: ReadThroughCache,
    pub steam: Arc<SteamProvider>,
    pub tiktok: Arc<TikTokProvider>,
    pub youtube: Arc<YoutubeProvider>,
}

impl AppState {
    /// 构建共享的翻译器、缓存与数据源
    pub fn build(config: &WebConfig, store: Arc<dyn KvStore>) -> Result<Self, ServerError> {
        let translator = Arc::new(Translator::embedded()?);
        let client = http_client(config.http_timeout)?;
        let cache = ReadThroughCache::new(KvNamespace::new(store, config.cache_namespace.clone()));

        Ok(Self {
            translator,
            cache,
            steam: Arc::new(
                SteamProvider::new(client.clone(), config.steam.clone()).with_ttl(config.cache_ttl),
            ),
            tiktok: Arc::new(
                TikTokProvider::new(client.clone(), config.tiktok.clone()).with_ttl(config.cache_ttl),
            ),
            youtube: Arc::new(
                YoutubeProvider::new(client, config.youtube.clone()).with_ttl(config.cache_ttl),
            ),
        })
    }
}

/// Steam 路径参数
#[derive(Debug, Deserialize)]
pub struct PlaytimePath {
    pub steam_id: String,
    pub app_id: String,
}

/// TikTok 路径参数
#[derive(Debug, Deserialize)]
pub struct TikTokPath {
    pub handle: String,
}

/// YouTube 路径参数
#[derive(Debug, Deserialize)]
pub struct YoutubePath {
    pub channel_id: String,
}

/// 文本格式查询参数
#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    #[serde(rename = "text-format")]
    pub text_format: Option<String>,
    #[serde(rename = "custom-text")]
    pub custom_text: Option<String>,
    /// 仅 TikTok 使用
    pub period: Option<String>,
}

/// 倒计时查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CountdownQuery {
    pub datetime: Option<String>,
    #[serde(rename = "text-format")]
    pub text_format: Option<String>,
}

/// 欢迎信息
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub store: &'static str,
    pub cache: CacheStats,
}
