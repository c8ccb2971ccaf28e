//! 上游 HTTP 调用的公共部分

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{ProviderError, ProviderResult};

const USER_AGENT: &str = concat!("spark-api/", env!("CARGO_PKG_VERSION"));

/// 构建带超时的 HTTP 客户端
pub fn http_client(timeout: Duration) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::transport("http", e))
}

/// 读取响应正文，非 2xx 状态返回 `Upstream`
pub async fn success_body(provider: &'static str, response: Response) -> ProviderResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::transport(provider, e))?;

    if !status.is_success() {
        tracing::warn!("{} 上游返回错误状态 {}: {}", provider, status, truncate(&body, 200));
        return Err(ProviderError::upstream_status(
            provider,
            status.as_u16(),
            truncate(&body, 200),
        ));
    }

    Ok(body)
}

/// 按目标结构解析 JSON，结构不符返回 `Parse`
pub fn parse_json<T: DeserializeOwned>(provider: &'static str, body: &str) -> ProviderResult<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!("{} 响应结构不符: {}", provider, e);
        ProviderError::parse(provider, e.to_string())
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
