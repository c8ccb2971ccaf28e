//! TikTok 最新视频
//!
//! 先用客户端凭据换取访问令牌，再调用研究接口查询指定用户在时间窗口内的
//! 视频，取 `create_time` 最大的一条。

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http::{parse_json, success_body};
use super::{Provider, ProviderError, ProviderResult, RemoteSource, TemplateData, VideoTextFormat};
use crate::cache::DEFAULT_TTL;
use crate::formatting::{compact_number, Variables};
use crate::i18n::Locale;

pub const TIKTOK_API_BASE_URL: &str = "https://open.tiktokapis.com";

const PROVIDER: &str = "tiktok";
const QUERY_FIELDS: &str =
    "id,create_time,video_description,like_count,comment_count,view_count,share_count,username";
const MAX_COUNT: u32 = 10;

/// TikTok 接口配置
#[derive(Debug, Clone)]
pub struct TikTokConfig {
    pub client_key: String,
    pub client_secret: String,
    pub base_url: String,
}

impl TikTokConfig {
    pub fn new(client_key: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            client_secret: client_secret.into(),
            base_url: TIKTOK_API_BASE_URL.to_string(),
        }
    }
}

/// 查询时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoPeriod {
    Last24Hours,
    #[default]
    Last7Days,
    Last30Days,
    Last90Days,
}

impl VideoPeriod {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Last24Hours => "last-24-hours",
            Self::Last7Days => "last-7-days",
            Self::Last30Days => "last-30-days",
            Self::Last90Days => "last-90-days",
        }
    }

    pub fn span(&self) -> chrono::Duration {
        match self {
            Self::Last24Hours => chrono::Duration::days(1),
            Self::Last7Days => chrono::Duration::days(7),
            Self::Last30Days => chrono::Duration::days(30),
            Self::Last90Days => chrono::Duration::days(90),
        }
    }

    /// 研究接口使用的 `YYYYMMDD` 起止日期
    pub fn date_range(&self, now: DateTime<Utc>) -> (String, String) {
        let start = now - self.span();
        (
            start.format("%Y%m%d").to_string(),
            now.format("%Y%m%d").to_string(),
        )
    }
}

impl fmt::Display for VideoPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for VideoPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-24-hours" => Ok(Self::Last24Hours),
            "last-7-days" => Ok(Self::Last7Days),
            "last-30-days" => Ok(Self::Last30Days),
            "last-90-days" => Ok(Self::Last90Days),
            other => Err(format!("未知的时间窗口: {}", other)),
        }
    }
}

/// 最新视频查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub handle: String,
    pub period: VideoPeriod,
}

impl VideoRequest {
    /// 去掉开头的 `@`，用户名不能为空
    pub fn new(handle: &str, period: VideoPeriod) -> ProviderResult<Self> {
        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(ProviderError::InvalidInput("TikTok 用户名不能为空".to_string()));
        }
        Ok(Self {
            handle: handle.to_string(),
            period,
        })
    }
}

/// 缓存的视频数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokVideo {
    pub title: String,
    pub url: String,
    pub likes: u64,
    pub views: u64,
    pub comments: u64,
    pub shares: u64,
    pub created_at: String,
}

impl TemplateData for TikTokVideo {
    fn variables(&self, locale: Locale) -> Variables {
        Variables::new()
            .with("title", self.title.as_str())
            .with("url", self.url.as_str())
            .with("likes", compact_number(self.likes, locale))
            .with("views", compact_number(self.views, locale))
            .with("comments", compact_number(self.comments, locale))
            .with("shares", compact_number(self.shares, locale))
            .with("createdAt", self.created_at.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
    expires_in: u64,
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    videos: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: u64,
    create_time: i64,
    #[serde(default)]
    video_description: String,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    share_count: u64,
    username: String,
}

/// TikTok 最新视频数据源
#[derive(Debug, Clone)]
pub struct TikTokProvider {
    client: Client,
    config: TikTokConfig,
    ttl: Duration,
}

impl TikTokProvider {
    pub fn new(client: Client, config: TikTokConfig) -> Self {
        Self {
            client,
            config,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 客户端凭据令牌
    async fn request_access_token(&self) -> ProviderResult<String> {
        let response = self
            .client
            .post(self.endpoint("/v2/oauth/token/"))
            .form(&[
                ("client_key", self.config.client_key.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let body = success_body(PROVIDER, response).await?;
        let token: AccessToken = parse_json(PROVIDER, &body)?;

        if token.token_type != "Bearer" {
            return Err(ProviderError::parse(
                PROVIDER,
                format!("不支持的令牌类型: {}", token.token_type),
            ));
        }

        tracing::debug!("已获取 TikTok 访问令牌 ({}s 后过期)", token.expires_in);
        Ok(token.access_token)
    }
}

#[async_trait]
impl RemoteSource for TikTokProvider {
    type Request = VideoRequest;
    type Data = TikTokVideo;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn cache_key(&self, request: &VideoRequest) -> String {
        format!("social:tiktok:latest-video:{}:{}", request.handle, request.period)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn fetch(&self, request: &VideoRequest) -> ProviderResult<String> {
        let access_token = self.request_access_token().await?;
        let (start_date, end_date) = request.period.date_range(Utc::now());

        let body = json!({
            "query": {
                "and": [{
                    "operation": "EQ",
                    "field_name": "username",
                    "field_values": [request.handle],
                }]
            },
            "start_date": start_date,
            "end_date": end_date,
            "max_count": MAX_COUNT,
        });

        let response = self
            .client
            .post(self.endpoint("/v2/research/video/query"))
            .query(&[("fields", QUERY_FIELDS)])
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        success_body(PROVIDER, response).await
    }

    fn parse(&self, request: &VideoRequest, body: &str) -> ProviderResult<TikTokVideo> {
        let parsed: QueryResponse = parse_json(PROVIDER, body)?;

        if let Some(error) = parsed.error.filter(|e| !e.code.eq_ignore_ascii_case("ok")) {
            return Err(ProviderError::Upstream {
                provider: PROVIDER,
                status: None,
                message: format!("{}: {}", error.code, error.message),
            });
        }

        let latest = parsed
            .data
            .map(|d| d.videos)
            .unwrap_or_default()
            .into_iter()
            .max_by_key(|video| video.create_time)
            .ok_or_else(|| {
                ProviderError::not_found(
                    PROVIDER,
                    format!("@{} 在 {} 内没有视频", request.handle, request.period),
                )
            })?;

        let created_at = DateTime::<Utc>::from_timestamp(latest.create_time, 0)
            .ok_or_else(|| ProviderError::parse(PROVIDER, format!("无效的时间戳: {}", latest.create_time)))?
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        Ok(TikTokVideo {
            title: latest.video_description,
            url: format!("https://www.tiktok.com/@{}/video/{}", latest.username, latest.id),
            likes: latest.like_count,
            views: latest.view_count,
            comments: latest.comment_count,
            shares: latest.share_count,
            created_at,
        })
    }
}

impl Provider for TikTokProvider {
    type Format = VideoTextFormat;
    const TEXT_KEY_PREFIX: &'static str = "social.tiktok.latest-video-text";
}
