// 集成测试公共模块
//
// 提供模拟上游服务、测试配置和共享的存储替身

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

use spark_api::kv::{KvError, KvResult, KvStore, MemoryKvStore, PutOptions};
use spark_api::providers::{ProviderResult, SteamConfig, TikTokConfig, YoutubeConfig};
use spark_api::web::{create_router, AppState, WebConfig};

pub const STEAM_ID: &str = "76561198209279900";
pub const APP_ID: &str = "381210";
pub const STEAM_PATH: &str = "/IPlayerService/GetOwnedGames/v1/";
pub const TIKTOK_TOKEN_PATH: &str = "/v2/oauth/token/";
pub const TIKTOK_QUERY_PATH: &str = "/v2/research/video/query";

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

/// 按路径返回固定 JSON 的模拟上游
pub struct MockUpstream {
    pub base_url: String,
    state: MockState,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn mock(&self, path: &str, status: StatusCode, body: impl Into<String>) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.into()));
    }

    pub fn mock_json(&self, path: &str, body: serde_json::Value) {
        self.mock(path, StatusCode::OK, body.to_string());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

async fn respond(State(state): State<MockState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let route = state.routes.lock().unwrap().get(&path).cloned();
    match route {
        Some((status, body)) => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"error":"no mock"}"#).into_response(),
    }
}

/// 所有数据源都指向同一个模拟上游
pub fn test_config(base_url: &str) -> WebConfig {
    WebConfig {
        bind_addr: "127.0.0.1".to_string(),
        port: 4343,
        cors_origins: vec!["*".to_string()],
        cache_ttl: Duration::from_secs(900),
        cache_namespace: "test".to_string(),
        redis_url: None,
        http_timeout: Duration::from_secs(5),
        steam: SteamConfig {
            api_key: "steam-key".to_string(),
            base_url: base_url.to_string(),
        },
        tiktok: TikTokConfig {
            client_key: "client-key".to_string(),
            client_secret: "client-secret".to_string(),
            base_url: base_url.to_string(),
        },
        youtube: YoutubeConfig {
            api_key: "youtube-key".to_string(),
            base_url: base_url.to_string(),
        },
    }
}

/// 构建指向模拟上游的完整应用
pub fn test_app(upstream: &MockUpstream) -> (Router, Arc<AppState>) {
    test_app_with_store(upstream, Arc::new(MemoryKvStore::new()))
}

pub fn test_app_with_store(upstream: &MockUpstream, store: Arc<dyn KvStore>) -> (Router, Arc<AppState>) {
    let config = test_config(&upstream.base_url);
    let state = Arc::new(AppState::build(&config, store).unwrap());
    (create_router(state.clone(), &config.cors_origins), state)
}

pub fn steam_owned_games(app_id: u64, name: &str, minutes: u64) -> serde_json::Value {
    serde_json::json!({
        "response": {
            "game_count": 1,
            "games": [{
                "appid": app_id,
                "name": name,
                "playtime_forever": minutes,
                "img_icon_url": ""
            }]
        }
    })
}

pub fn tiktok_token(token_type: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": "clt.test-token",
        "expires_in": 7200,
        "token_type": token_type
    })
}

pub fn tiktok_videos() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "videos": [
                {
                    "id": 7001,
                    "create_time": 1700000000,
                    "video_description": "older video",
                    "like_count": 10,
                    "comment_count": 1,
                    "view_count": 100,
                    "share_count": 0,
                    "username": "sparkuser"
                },
                {
                    "id": 7002,
                    "create_time": 1700086400,
                    "video_description": "newest video",
                    "like_count": 1500,
                    "comment_count": 42,
                    "view_count": 2500000,
                    "share_count": 7,
                    "username": "sparkuser"
                }
            ],
            "cursor": 2,
            "has_more": false
        },
        "error": { "code": "ok", "message": "", "log_id": "test" }
    })
}

/// 频道、上传列表、视频详情三段响应
pub fn mock_youtube(upstream: &MockUpstream) {
    upstream.mock_json(
        "/channels",
        serde_json::json!({
            "items": [{ "contentDetails": { "relatedPlaylists": { "uploads": "UUspark" } } }]
        }),
    );
    upstream.mock_json(
        "/playlistItems",
        serde_json::json!({
            "items": [
                { "snippet": { "publishedAt": "2024-01-01T10:00:00Z", "resourceId": { "videoId": "old" } } },
                { "snippet": { "publishedAt": "2024-03-01T10:00:00+02:00", "resourceId": { "videoId": "new" } } }
            ]
        }),
    );
    upstream.mock_json(
        "/videos",
        serde_json::json!({
            "items": [{
                "id": "new",
                "snippet": {
                    "title": "Spark devlog",
                    "channelTitle": "Spark",
                    "publishedAt": "2024-03-01T08:00:00Z"
                },
                "statistics": { "viewCount": "12345", "likeCount": "678" }
            }]
        }),
    );
}

/// 记录调用次数的抓取函数
#[derive(Clone, Default)]
pub struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

impl CountingFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn fetch<T>(&self, value: T) -> ProviderResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }
}

/// 读写都可以单独失败的存储
pub struct FailingStore {
    pub fail_reads: bool,
    pub fail_writes: bool,
    inner: MemoryKvStore,
}

impl FailingStore {
    pub fn new(fail_reads: bool, fail_writes: bool) -> Self {
        Self {
            fail_reads,
            fail_writes,
            inner: MemoryKvStore::new(),
        }
    }
}

#[async_trait]
impl KvStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads {
            return Err(KvError::Unavailable("read refused".to_string()));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String, options: PutOptions) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable("write refused".to_string()));
        }
        self.inner.put(key, value, options).await
    }
}
