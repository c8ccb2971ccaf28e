//! 请求语言检测
//!
//! 顺序：路径中的 `:lang` → `Accept-Language` → 默认语言。

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, RawPathParams},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};

use crate::i18n::Locale;

/// 当前请求的语言区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let from_path = RawPathParams::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(name, _)| *name == "lang")
                    .and_then(|(_, value)| Locale::from_tag(value))
            });

        let locale = from_path
            .or_else(|| {
                parts
                    .headers
                    .get(ACCEPT_LANGUAGE)
                    .and_then(|value| value.to_str().ok())
                    .and_then(Locale::from_accept_language)
            })
            .unwrap_or_default();

        Ok(RequestLocale(locale))
    }
}
