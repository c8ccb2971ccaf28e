//! 欢迎、健康检查与未匹配路由

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Json,
};
use chrono::Utc;

use crate::web::types::{AppState, HealthResponse, WelcomeResponse};

pub async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Spark API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 服务状态与缓存统计
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        store: state.cache.namespace().store_name(),
        cache: state.cache.stats(),
    })
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    tracing::debug!("未匹配的路由: {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "message": format!("Not Found - {}", uri.path())
        })),
    )
}
