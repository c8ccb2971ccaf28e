//! 时间分解
//!
//! 把分钟数拆成天/小时/分钟/秒，以及计算到某个时刻的倒计时。

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{TextFormat, UnknownFormat, Variables};

/// 分钟数的完整分解，负数、NaN 和无穷大按 0 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    pub total_days: u64,
    pub total_hours_minus_days: u64,
    pub total_minutes_minus_hours: u64,
    pub total_seconds_minus_minutes: u64,
    pub total_hours: u64,
    pub total_minutes: u64,
    pub total_seconds: u64,
}

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

impl TimeInfo {
    pub fn from_minutes(minutes: f64) -> Self {
        let m = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };

        let remaining_after_days = m % MINUTES_PER_DAY;

        Self {
            total_days: (m / MINUTES_PER_DAY).floor() as u64,
            total_hours_minus_days: (remaining_after_days / 60.0).floor() as u64,
            total_minutes_minus_hours: (remaining_after_days % 60.0).floor() as u64,
            total_seconds_minus_minutes: ((remaining_after_days % 1.0) * 60.0).floor() as u64,
            total_hours: (m / 60.0).floor() as u64,
            total_minutes: (m % 60.0).floor() as u64,
            total_seconds: (m * 60.0).floor() as u64,
        }
    }

    pub fn to_variables(&self) -> Variables {
        Variables::new()
            .with("totalDays", self.total_days)
            .with("totalHoursMinusDays", self.total_hours_minus_days)
            .with("totalMinutesMinusHours", self.total_minutes_minus_hours)
            .with("totalSecondsMinusMinutes", self.total_seconds_minus_minutes)
            .with("totalHours", self.total_hours)
            .with("totalMinutes", self.total_minutes)
            .with("totalSeconds", self.total_seconds)
    }
}

/// `125` → `"2h 5m"`
pub fn minutes_to_hours(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// 到目标时刻的剩余时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// 目标已过去时返回 `None`
    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Option<Self> {
        let remaining = target.signed_duration_since(now);
        if remaining < chrono::Duration::zero() {
            return None;
        }

        let seconds = remaining.num_seconds();
        let minutes = seconds / 60;
        let hours = minutes / 60;

        Some(Self {
            days: hours / 24,
            hours: hours % 24,
            minutes: minutes % 60,
            seconds: seconds % 60,
        })
    }

    pub fn to_variables(&self) -> Variables {
        Variables::new()
            .with("days", self.days)
            .with("hours", self.hours)
            .with("minutes", self.minutes)
            .with("seconds", self.seconds)
    }
}

/// 倒计时文本格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownFormat {
    #[default]
    Full,
    Short,
}

impl FromStr for CountdownFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "short" => Ok(Self::Short),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl TextFormat for CountdownFormat {
    fn key(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Short => "short",
        }
    }

    fn is_custom(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decomposition_of_125_minutes() {
        let info = TimeInfo::from_minutes(125.0);
        assert_eq!(info.total_hours, 2);
        assert_eq!(info.total_minutes, 5);
        assert_eq!(info.total_days, 0);
        assert_eq!(info.total_hours_minus_days, 2);
        assert_eq!(info.total_minutes_minus_hours, 5);
        assert_eq!(info.total_seconds, 7500);
        assert_eq!(info.total_seconds_minus_minutes, 0);
    }

    #[test]
    fn test_decomposition_is_consistent() {
        for m in [0u64, 1, 59, 60, 61, 1439, 1440, 1441, 10_000, 987_654] {
            let info = TimeInfo::from_minutes(m as f64);
            assert_eq!(info.total_minutes, m % 60);
            assert_eq!(info.total_hours * 60 + info.total_minutes, m);
            assert_eq!(
                info.total_days * 1440 + info.total_hours_minus_days * 60 + info.total_minutes_minus_hours,
                m
            );
        }
    }

    #[test]
    fn test_fractional_minutes_yield_seconds() {
        let info = TimeInfo::from_minutes(61.5);
        assert_eq!(info.total_seconds_minus_minutes, 30);
        assert_eq!(info.total_seconds, 3690);
    }

    #[test]
    fn test_negative_and_non_finite_clamp_to_zero() {
        assert_eq!(TimeInfo::from_minutes(-5.0), TimeInfo::from_minutes(0.0));
        assert_eq!(TimeInfo::from_minutes(f64::NAN), TimeInfo::default());
        assert_eq!(TimeInfo::from_minutes(f64::INFINITY), TimeInfo::default());
    }

    #[test]
    fn test_variables_use_camel_case_names() {
        let vars = TimeInfo::from_minutes(125.0).to_variables();
        assert_eq!(vars.get("totalHours").map(|v| v.to_string()), Some("2".to_string()));
        assert_eq!(vars.get("totalMinutesMinusHours").map(|v| v.to_string()), Some("5".to_string()));
        assert_eq!(vars.len(), 7);
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(125), "2h 5m");
        assert_eq!(minutes_to_hours(0), "0h 0m");
    }

    #[test]
    fn test_countdown() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let target = Utc.with_ymd_and_hms(2030, 1, 3, 5, 6, 7).unwrap();

        let countdown = Countdown::until(now, target).unwrap();
        assert_eq!(
            countdown,
            Countdown { days: 2, hours: 5, minutes: 6, seconds: 7 }
        );
        assert!(Countdown::until(target, now).is_none());
    }

    #[test]
    fn test_countdown_format_parse() {
        assert_eq!("short".parse::<CountdownFormat>().unwrap(), CountdownFormat::Short);
        assert!("long".parse::<CountdownFormat>().is_err());
    }
}
