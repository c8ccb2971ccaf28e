//! 上游数据源
//!
//! 每个数据源实现 `RemoteSource`（缓存键、TTL、抓取、解析），由
//! [`ReadThroughCache::get_data`](crate::cache::ReadThroughCache::get_data)
//! 统一完成缓存读写。`Provider` 在此之上增加文本格式化。

pub mod error;
pub mod formats;
pub mod http;
pub mod steam;
pub mod tiktok;
pub mod youtube;

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::DEFAULT_TTL;
use crate::formatting::{render, TemplateSource, TextFormat, Variables};
use crate::i18n::{Locale, LocalizedTranslator};

pub use error::{ErrorKind, ProviderError, ProviderResult};
pub use formats::{PlaytimeFormat, VideoTextFormat};
pub use steam::{PlaytimeData, PlaytimeRequest, SteamConfig, SteamProvider};
pub use tiktok::{TikTokConfig, TikTokProvider, TikTokVideo, VideoPeriod, VideoRequest};
pub use youtube::{ChannelRequest, YoutubeConfig, YoutubeProvider, YoutubeVideo};

/// 可被读穿缓存包装的远程数据源
#[async_trait]
pub trait RemoteSource: Send + Sync {
    type Request: Send + Sync;
    type Data: Serialize + DeserializeOwned + Send + Sync;

    /// 数据源名称，用于日志与错误
    fn name(&self) -> &'static str;

    /// 由实体标识确定的缓存键
    fn cache_key(&self, request: &Self::Request) -> String;

    fn ttl(&self) -> Duration {
        DEFAULT_TTL
    }

    /// 调用上游，返回原始响应正文
    async fn fetch(&self, request: &Self::Request) -> ProviderResult<String>;

    /// 校验响应结构并提取领域数据
    fn parse(&self, request: &Self::Request, body: &str) -> ProviderResult<Self::Data>;
}

/// 可用于模板渲染的数据
pub trait TemplateData {
    fn variables(&self, locale: Locale) -> Variables;
}

/// 带文本格式化的数据源
pub trait Provider: RemoteSource {
    type Format: TextFormat;

    /// 翻译目录中的格式键前缀
    const TEXT_KEY_PREFIX: &'static str;

    /// 渲染文本
    ///
    /// `custom` 格式且给出非空模板时使用调用方模板，否则使用
    /// `<前缀>.<格式键>` 对应的翻译目录模板。
    fn format_text(
        &self,
        data: &Self::Data,
        format: Self::Format,
        translator: &LocalizedTranslator<'_>,
        custom: Option<&str>,
    ) -> String
    where
        Self::Data: TemplateData,
    {
        let vars = data.variables(translator.locale());
        let source = match custom.filter(|template| !template.is_empty()) {
            Some(template) if format.is_custom() => TemplateSource::Custom(template),
            _ => TemplateSource::Catalog(format!("{}.{}", Self::TEXT_KEY_PREFIX, format.key())),
        };

        tracing::debug!("{} 使用模板 {:?} 渲染文本 ({})", self.name(), source, translator.locale());
        render(translator, source, &vars)
    }
}
