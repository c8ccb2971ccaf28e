//! Web 路由定义
//!
//! 所有路由都位于 `/api/:lang` 下，语言由 `RequestLocale` 从路径读取。

use std::sync::Arc;

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Router,
};

use crate::web::{handlers::*, types::AppState};

const CACHE_CONTROL_VALUE: &str = "max-age=3600";

/// 成功响应附加缓存头
async fn cache_control(mut response: Response) -> Response {
    if response.status() == StatusCode::OK {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    }
    response
}

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    let cached = Router::new()
        // 社交数据
        .route("/api/:lang/steam/hours/:steam_id/:app_id", get(steam_playtime))
        .route("/api/:lang/tiktok/:handle/latest", get(tiktok_latest_video))
        .route("/api/:lang/youtube/:channel_id/latest", get(youtube_latest_video))
        // 杂项
        .route("/api/:lang/date-time/countdown", get(countdown))
        .layer(middleware::map_response(cache_control));

    Router::new()
        .route("/api/:lang", get(index))
        .route("/api/:lang/", get(index))
        .route("/api/:lang/health", get(health))
        .merge(cached)
        .fallback(not_found)
}
