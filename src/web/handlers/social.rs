//! 社交数据处理器（Steam、TikTok、YouTube）

use std::sync::Arc;

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};

use crate::formatting::{TextFormat, Variables};
use crate::i18n::LocalizedTranslator;
use crate::providers::{
    ChannelRequest, PlaytimeFormat, PlaytimeRequest, Provider, VideoPeriod, VideoRequest,
    VideoTextFormat,
};
use crate::web::error::{ApiError, STEAM_ERRORS, TIKTOK_ERRORS, YOUTUBE_ERRORS};
use crate::web::locale::RequestLocale;
use crate::web::types::{AppState, PlaytimePath, TextQuery, TikTokPath, YoutubePath};

/// 解析 `text-format`，缺省或为空时使用默认格式
pub(crate) fn parse_format<F: TextFormat>(
    raw: Option<&str>,
    t: &LocalizedTranslator<'_>,
) -> Result<F, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(F::default()),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::invalid_query(t, "text-format", value)),
    }
}

/// Steam 游戏时长
pub async fn steam_playtime(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    path: Result<Path<PlaytimePath>, PathRejection>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let t = state.translator.bind(locale);
    let Path(path) = path.map_err(|e| ApiError::invalid_input(&t, e))?;
    let Query(query) = query.map_err(|e| ApiError::invalid_input(&t, e))?;
    let vars = Variables::new()
        .with("steamId", path.steam_id.as_str())
        .with("appId", path.app_id.as_str());

    let format: PlaytimeFormat = parse_format(query.text_format.as_deref(), &t)?;
    let request = PlaytimeRequest::new(&path.steam_id, &path.app_id)
        .map_err(|e| ApiError::from_provider(&e, &t, &STEAM_ERRORS, &vars))?;

    let data = state
        .cache
        .get_data(state.steam.as_ref(), &request)
        .await
        .map_err(|e| ApiError::from_provider(&e, &t, &STEAM_ERRORS, &vars))?;

    Ok(state
        .steam
        .format_text(&data, format, &t, query.custom_text.as_deref()))
}

/// TikTok 最新视频
pub async fn tiktok_latest_video(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    path: Result<Path<TikTokPath>, PathRejection>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let t = state.translator.bind(locale);
    let Path(path) = path.map_err(|e| ApiError::invalid_input(&t, e))?;
    let Query(query) = query.map_err(|e| ApiError::invalid_input(&t, e))?;
    let handle = path.handle.trim_start_matches('@');
    let vars = Variables::new().with("handle", handle);

    let format: VideoTextFormat = parse_format(query.text_format.as_deref(), &t)?;
    let period = match query.period.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        None => VideoPeriod::default(),
        Some(raw) => raw
            .parse::<VideoPeriod>()
            .map_err(|_| ApiError::invalid_query(&t, "period", raw))?,
    };

    let request = VideoRequest::new(handle, period)
        .map_err(|e| ApiError::from_provider(&e, &t, &TIKTOK_ERRORS, &vars))?;

    let video = state
        .cache
        .get_data(state.tiktok.as_ref(), &request)
        .await
        .map_err(|e| ApiError::from_provider(&e, &t, &TIKTOK_ERRORS, &vars))?;

    Ok(state
        .tiktok
        .format_text(&video, format, &t, query.custom_text.as_deref()))
}

/// YouTube 最新视频
pub async fn youtube_latest_video(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    path: Result<Path<YoutubePath>, PathRejection>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let t = state.translator.bind(locale);
    let Path(path) = path.map_err(|e| ApiError::invalid_input(&t, e))?;
    let Query(query) = query.map_err(|e| ApiError::invalid_input(&t, e))?;
    let vars = Variables::new().with("channelId", path.channel_id.as_str());

    let format: VideoTextFormat = parse_format(query.text_format.as_deref(), &t)?;
    let request = ChannelRequest::new(&path.channel_id)
        .map_err(|e| ApiError::from_provider(&e, &t, &YOUTUBE_ERRORS, &vars))?;

    let video = state
        .cache
        .get_data(state.youtube.as_ref(), &request)
        .await
        .map_err(|e| ApiError::from_provider(&e, &t, &YOUTUBE_ERRORS, &vars))?;

    Ok(state
        .youtube
        .format_text(&video, format, &t, query.custom_text.as_deref()))
}
