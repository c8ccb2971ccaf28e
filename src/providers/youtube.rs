//! YouTube 最新视频
//!
//! 频道 → 上传播放列表 → 最新一条播放列表项 → 视频详情（含统计数据）。
//! 前两步的响应只用于定位视频，缓存与解析的是最后一步的视频详情。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{parse_json, success_body};
use super::{Provider, ProviderError, ProviderResult, RemoteSource, TemplateData, VideoTextFormat};
use crate::cache::DEFAULT_TTL;
use crate::formatting::{compact_number, Variables};
use crate::i18n::Locale;

pub const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const PROVIDER: &str = "youtube";

/// YouTube Data API 配置
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub api_key: String,
    pub base_url: String,
}

impl YoutubeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: YOUTUBE_API_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    pub channel_id: String,
}

impl ChannelRequest {
    pub fn new(channel_id: &str) -> ProviderResult<Self> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(ProviderError::InvalidInput("频道 ID 不能为空".to_string()));
        }
        Ok(Self {
            channel_id: channel_id.to_string(),
        })
    }
}

/// 缓存的视频数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeVideo {
    pub title: String,
    pub url: String,
    pub channel_title: String,
    pub published_at: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl TemplateData for YoutubeVideo {
    fn variables(&self, locale: Locale) -> Variables {
        Variables::new()
            .with("title", self.title.as_str())
            .with("url", self.url.as_str())
            .with("channelTitle", self.channel_title.as_str())
            .with("publishedAt", self.published_at.as_str())
            .with("views", compact_number(self.views, locale))
            .with("likes", compact_number(self.likes, locale))
            .with("comments", compact_number(self.comments, locale))
    }
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    published_at: DateTime<FixedOffset>,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    channel_title: String,
    published_at: String,
}

/// 统计数值以字符串返回，被隐藏的计数字段会缺失
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn parse_count(field: &str, value: Option<&str>) -> ProviderResult<u64> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| ProviderError::parse(PROVIDER, format!("无效的 {} 数值: {}", field, raw))),
    }
}

/// YouTube 最新视频数据源
#[derive(Debug, Clone)]
pub struct YoutubeProvider {
    client: Client,
    config: YoutubeConfig,
    ttl: Duration,
}

impl YoutubeProvider {
    pub fn new(client: Client, config: YoutubeConfig) -> Self {
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

    async fn get(&self, resource: &str, params: &[(&str, &str)]) -> ProviderResult<String> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        success_body(PROVIDER, response).await
    }

    async fn uploads_playlist(&self, channel_id: &str) -> ProviderResult<String> {
        let body = self
            .get("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;
        let channels: ChannelListResponse = parse_json(PROVIDER, &body)?;

        channels
            .items
            .into_iter()
            .next()
            .map(|item| item.content_details.related_playlists.uploads)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, format!("频道不存在: {}", channel_id)))
    }

    async fn latest_video_id(&self, playlist_id: &str) -> ProviderResult<String> {
        let body = self
            .get(
                "playlistItems",
                &[("part", "snippet"), ("maxResults", "50"), ("playlistId", playlist_id)],
            )
            .await?;
        let playlist: PlaylistItemsResponse = parse_json(PROVIDER, &body)?;

        playlist
            .items
            .into_iter()
            .max_by_key(|item| item.snippet.published_at)
            .map(|item| item.snippet.resource_id.video_id)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, format!("播放列表为空: {}", playlist_id)))
    }
}

#[async_trait]
impl RemoteSource for YoutubeProvider {
    type Request = ChannelRequest;
    type Data = YoutubeVideo;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn cache_key(&self, request: &ChannelRequest) -> String {
        format!("social:youtube:latest-video:{}", request.channel_id)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn fetch(&self, request: &ChannelRequest) -> ProviderResult<String> {
        let playlist_id = self.uploads_playlist(&request.channel_id).await?;
        let video_id = self.latest_video_id(&playlist_id).await?;
        tracing::debug!("频道 {} 最新视频: {}", request.channel_id, video_id);

        self.get("videos", &[("part", "snippet,statistics"), ("id", video_id.as_str())])
            .await
    }

    fn parse(&self, request: &ChannelRequest, body: &str) -> ProviderResult<YoutubeVideo> {
        let videos: VideoListResponse = parse_json(PROVIDER, body)?;
        let video = videos.items.into_iter().next().ok_or_else(|| {
            ProviderError::not_found(PROVIDER, format!("频道 {} 的视频详情为空", request.channel_id))
        })?;

        let stats = &video.statistics;
        Ok(YoutubeVideo {
            url: format!("https://www.youtube.com/watch?v={}", video.id),
            views: parse_count("viewCount", stats.view_count.as_deref())?,
            likes: parse_count("likeCount", stats.like_count.as_deref())?,
            comments: parse_count("commentCount", stats.comment_count.as_deref())?,
            title: video.snippet.title,
            channel_title: video.snippet.channel_title,
            published_at: video.snippet.published_at,
        })
    }
}

impl Provider for YoutubeProvider {
    type Format = VideoTextFormat;
    const TEXT_KEY_PREFIX: &'static str = "social.youtube.latest-video-text";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YoutubeProvider {
        YoutubeProvider::new(Client::new(), YoutubeConfig::new("key"))
    }

    fn request() -> ChannelRequest {
        ChannelRequest::new("UC123").unwrap()
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(provider().cache_key(&request()), "social:youtube:latest-video:UC123");
        assert!(ChannelRequest::new("  ").is_err());
    }

    #[test]
    fn test_parse_video_details() {
        let body = r#"{"items":[{
            "id":"abc",
            "snippet":{"title":"Launch","channelTitle":"Spark","publishedAt":"2024-05-01T10:00:00Z"},
            "statistics":{"viewCount":"15300","commentCount":"12"}
        }]}"#;

        let video = provider().parse(&request(), body).unwrap();
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(video.views, 15300);
        assert_eq!(video.likes, 0);
        assert_eq!(video.comments, 12);
        assert_eq!(video.channel_title, "Spark");
    }

    #[test]
    fn test_parse_errors() {
        let p = provider();
        assert!(matches!(p.parse(&request(), r#"{"items":[]}"#), Err(ProviderError::NotFound { .. })));
        assert!(matches!(
            p.parse(
                &request(),
                r#"{"items":[{"id":"a","snippet":{"title":"t","publishedAt":"x"},"statistics":{"viewCount":"many"}}]}"#
            ),
            Err(ProviderError::Parse { .. })
        ));
    }
}
