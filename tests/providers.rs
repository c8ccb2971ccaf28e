//! 数据源集成测试
//!
//! 使用本地模拟上游验证 Steam、TikTok、YouTube 的请求与解析流程

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use spark_api::cache::ReadThroughCache;
use spark_api::kv::{KvNamespace, MemoryKvStore};
use spark_api::providers::http::http_client;
use spark_api::providers::{
    ChannelRequest, PlaytimeRequest, ProviderError, SteamConfig, SteamProvider, TikTokConfig,
    TikTokProvider, VideoPeriod, VideoRequest, YoutubeConfig, YoutubeProvider,
};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::*;

fn cache() -> ReadThroughCache {
    ReadThroughCache::new(KvNamespace::new(Arc::new(MemoryKvStore::new()), "test"))
}

fn steam(upstream: &MockUpstream) -> SteamProvider {
    let config = SteamConfig {
        api_key: "steam-key".to_string(),
        base_url: upstream.base_url.clone(),
    };
    SteamProvider::new(http_client(Duration::from_secs(5)).unwrap(), config)
}

fn tiktok(upstream: &MockUpstream) -> TikTokProvider {
    let config = TikTokConfig {
        client_key: "client-key".to_string(),
        client_secret: "client-secret".to_string(),
        base_url: upstream.base_url.clone(),
    };
    TikTokProvider::new(http_client(Duration::from_secs(5)).unwrap(), config)
}

fn youtube(upstream: &MockUpstream) -> YoutubeProvider {
    let config = YoutubeConfig {
        api_key: "youtube-key".to_string(),
        base_url: upstream.base_url.clone(),
    };
    YoutubeProvider::new(http_client(Duration::from_secs(5)).unwrap(), config)
}

fn playtime_request() -> PlaytimeRequest {
    PlaytimeRequest::new(STEAM_ID, APP_ID).unwrap()
}

/// Steam 时长抓取，第二次读取来自缓存
#[tokio::test]
async fn test_steam_playtime_is_cached() {
    let upstream = MockUpstream::start().await;
    upstream.mock_json(STEAM_PATH, steam_owned_games(381210, "Dead by Daylight", 125));

    let provider = steam(&upstream);
    let cache = cache();

    let first = cache.get_data(&provider, &playtime_request()).await.unwrap();
    let second = cache.get_data(&provider, &playtime_request()).await.unwrap();

    assert_eq!(first.playtime_in_minutes, 125);
    assert_eq!(first.game_name, "Dead by Daylight");
    assert_eq!(first, second);
    assert_eq!(upstream.hits(STEAM_PATH), 1);

    println!("✅ Steam 缓存测试通过");
}

/// 库中没有游戏时返回 NotFound
#[tokio::test]
async fn test_steam_missing_game() {
    let upstream = MockUpstream::start().await;
    let provider = steam(&upstream);

    upstream.mock_json(STEAM_PATH, serde_json::json!({ "response": {} }));
    let result = cache().get_data(&provider, &playtime_request()).await;
    assert!(matches!(result, Err(ProviderError::NotFound { .. })));

    upstream.mock_json(STEAM_PATH, steam_owned_games(1, "Another Game", 30));
    let result = cache().get_data(&provider, &playtime_request()).await;
    assert!(matches!(result, Err(ProviderError::NotFound { .. })));

    println!("✅ Steam 未找到测试通过");
}

/// 上游错误状态与结构不符
#[tokio::test]
async fn test_steam_upstream_failures() {
    let upstream = MockUpstream::start().await;
    let provider = steam(&upstream);
    let cache = cache();

    upstream.mock(STEAM_PATH, StatusCode::INTERNAL_SERVER_ERROR, "oops");
    let result = cache.get_data(&provider, &playtime_request()).await;
    assert!(matches!(
        result,
        Err(ProviderError::Upstream { status: Some(500), .. })
    ));

    upstream.mock(STEAM_PATH, StatusCode::OK, r#"{"unexpected":true}"#);
    let result = cache.get_data(&provider, &playtime_request()).await;
    assert!(matches!(result, Err(ProviderError::Parse { .. })));

    // 失败不缓存，两次都访问了上游
    assert_eq!(upstream.hits(STEAM_PATH), 2);
    assert_eq!(cache.stats().writes, 0);

    println!("✅ Steam 上游错误测试通过");
}

/// TikTok 取创建时间最新的视频
#[tokio::test]
async fn test_tiktok_latest_video() {
    let upstream = MockUpstream::start().await;
    upstream.mock_json(TIKTOK_TOKEN_PATH, tiktok_token("Bearer"));
    upstream.mock_json(TIKTOK_QUERY_PATH, tiktok_videos());

    let provider = tiktok(&upstream);
    let request = VideoRequest::new("@sparkuser", VideoPeriod::Last30Days).unwrap();
    let video = cache().get_data(&provider, &request).await.unwrap();

    assert_eq!(video.title, "newest video");
    assert_eq!(video.url, "https://www.tiktok.com/@sparkuser/video/7002");
    assert_eq!(video.views, 2_500_000);
    assert_eq!(video.likes, 1500);
    assert_eq!(video.created_at, "2023-11-15T22:13:20.000Z");
    assert_eq!(upstream.hits(TIKTOK_TOKEN_PATH), 1);
    assert_eq!(upstream.hits(TIKTOK_QUERY_PATH), 1);

    println!("✅ TikTok 最新视频测试通过");
}

/// 非 Bearer 令牌被拒绝，不会发起查询
#[tokio::test]
async fn test_tiktok_rejects_unknown_token_type() {
    let upstream = MockUpstream::start().await;
    upstream.mock_json(TIKTOK_TOKEN_PATH, tiktok_token("mac"));
    upstream.mock_json(TIKTOK_QUERY_PATH, tiktok_videos());

    let provider = tiktok(&upstream);
    let request = VideoRequest::new("sparkuser", VideoPeriod::default()).unwrap();
    let result = cache().get_data(&provider, &request).await;

    assert!(matches!(result, Err(ProviderError::Parse { .. })));
    assert_eq!(upstream.hits(TIKTOK_QUERY_PATH), 0);

    println!("✅ TikTok 令牌类型测试通过");
}

/// YouTube 三段请求：频道 → 上传列表 → 视频详情
#[tokio::test]
async fn test_youtube_latest_video() {
    let upstream = MockUpstream::start().await;
    mock_youtube(&upstream);

    let provider = youtube(&upstream);
    let request = ChannelRequest::new("UCspark").unwrap();
    let video = cache().get_data(&provider, &request).await.unwrap();

    assert_eq!(video.title, "Spark devlog");
    assert_eq!(video.url, "https://www.youtube.com/watch?v=new");
    assert_eq!(video.channel_title, "Spark");
    assert_eq!(video.views, 12345);
    assert_eq!(video.likes, 678);
    assert_eq!(video.comments, 0);

    println!("✅ YouTube 最新视频测试通过");
}

/// 频道不存在时返回 NotFound
#[tokio::test]
async fn test_youtube_unknown_channel() {
    let upstream = MockUpstream::start().await;
    upstream.mock_json("/channels", serde_json::json!({ "items": [] }));

    let provider = youtube(&upstream);
    let request = ChannelRequest::new("UCmissing").unwrap();
    let result = cache().get_data(&provider, &request).await;

    assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    assert_eq!(upstream.hits("/playlistItems"), 0);

    println!("✅ YouTube 频道不存在测试通过");
}
