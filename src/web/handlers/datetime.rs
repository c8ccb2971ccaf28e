//! 日期时间处理器

use std::sync::Arc;

use axum::extract::{rejection::QueryRejection, Query, State};
use chrono::{DateTime, Utc};

use super::social::parse_format;
use crate::formatting::{render, Countdown, CountdownFormat, TemplateSource, TextFormat, Variables};
use crate::web::error::ApiError;
use crate::web::locale::RequestLocale;
use crate::web::types::{AppState, CountdownQuery};

/// 到指定时刻的倒计时
pub async fn countdown(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    query: Result<Query<CountdownQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    let t = state.translator.bind(locale);
    let Query(query) = query.map_err(|e| ApiError::invalid_input(&t, e))?;
    let format: CountdownFormat = parse_format(query.text_format.as_deref(), &t)?;

    let raw = query.datetime.as_deref().unwrap_or_default().trim();
    let target = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| ApiError::invalid_query(&t, "datetime", raw))?
        .with_timezone(&Utc);

    let Some(countdown) = Countdown::until(Utc::now(), target) else {
        return Ok(t.t("miscellaneous.date-time.error.already-passed", &Variables::new()));
    };

    tracing::debug!(
        "倒计时至 {}: {}天 {}时 {}分 {}秒",
        target.to_rfc3339(),
        countdown.days,
        countdown.hours,
        countdown.minutes,
        countdown.seconds
    );

    let key = format!("miscellaneous.date-time.countdown.{}", format.key());
    Ok(render(&t, TemplateSource::Catalog(key), &countdown.to_variables()))
}
