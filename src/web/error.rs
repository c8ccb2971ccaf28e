//! HTTP 错误映射
//!
//! 用户可见的错误消息都经过翻译，内部细节只写入日志。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::env::EnvError;
use crate::formatting::Variables;
use crate::i18n::{CatalogError, LocalizedTranslator};
use crate::providers::{ErrorKind, ProviderError};

/// 提供者相关的错误消息键
#[derive(Debug, Clone, Copy)]
pub struct ErrorMessages {
    /// 上游或解析失败
    pub failure: &'static str,
    /// 没有匹配的数据
    pub not_found: &'static str,
}

pub const STEAM_ERRORS: ErrorMessages = ErrorMessages {
    failure: "social.steam.error.playtime",
    not_found: "social.steam.error.not-found",
};

pub const TIKTOK_ERRORS: ErrorMessages = ErrorMessages {
    failure: "social.tiktok.error.latest-video",
    not_found: "social.tiktok.error.not-found",
};

pub const YOUTUBE_ERRORS: ErrorMessages = ErrorMessages {
    failure: "social.youtube.error.latest-video",
    not_found: "social.youtube.error.not-found",
};

/// 返回给客户端的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 查询参数取值无效
    pub fn invalid_query(t: &LocalizedTranslator<'_>, parameter: &str, value: &str) -> Self {
        let vars = Variables::new()
            .with("parameter", parameter)
            .with("value", value);
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, t.t("errors.invalid-query", &vars))
    }

    /// 路径或查询参数无法解析，细节只写入日志
    pub fn invalid_input(t: &LocalizedTranslator<'_>, detail: impl std::fmt::Display) -> Self {
        tracing::info!("请求参数无法解析: {}", detail);
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            t.t("errors.invalid-input", &Variables::new()),
        )
    }

    /// 按错误类别选择状态码与翻译消息
    pub fn from_provider(
        err: &ProviderError,
        t: &LocalizedTranslator<'_>,
        messages: &ErrorMessages,
        vars: &Variables,
    ) -> Self {
        let (status, key) = match err.kind() {
            ErrorKind::InvalidInput => (StatusCode::UNPROCESSABLE_ENTITY, "errors.invalid-input"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, messages.not_found),
            ErrorKind::Upstream | ErrorKind::Parse => (StatusCode::BAD_GATEWAY, messages.failure),
            ErrorKind::Cache => (StatusCode::SERVICE_UNAVAILABLE, "errors.cache"),
        };

        if status.is_server_error() {
            tracing::error!("请求失败 ({}): {}", status, err);
        } else {
            tracing::info!("请求未完成 ({}): {}", status, err);
        }

        Self::new(status, t.t(key, vars))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "success": false,
                "error": self.message,
            })),
        )
            .into_response()
    }
}

/// 服务启动错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] EnvError),

    #[error("翻译目录错误: {0}")]
    Catalog(#[from] CatalogError),

    #[error("HTTP 客户端初始化失败: {0}")]
    Client(#[from] ProviderError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}
