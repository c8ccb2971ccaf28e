//! 提供者文本格式

use std::str::FromStr;

use crate::formatting::{TextFormat, UnknownFormat};

/// Steam 游戏时长文本格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaytimeFormat {
    #[default]
    Standard,
    Compact,
    Detailed,
    CompactWithSeconds,
    Extended,
    Minimal,
    Full,
    ShortTime,
    Precise,
    Casual,
    Custom,
}

impl PlaytimeFormat {
    pub const ALL: [PlaytimeFormat; 11] = [
        Self::Standard,
        Self::Compact,
        Self::Detailed,
        Self::CompactWithSeconds,
        Self::Extended,
        Self::Minimal,
        Self::Full,
        Self::ShortTime,
        Self::Precise,
        Self::Casual,
        Self::Custom,
    ];
}

impl TextFormat for PlaytimeFormat {
    fn key(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compact => "compact",
            Self::Detailed => "detailed",
            Self::CompactWithSeconds => "compact-with-seconds",
            Self::Extended => "extended",
            Self::Minimal => "minimal",
            Self::Full => "full",
            Self::ShortTime => "short-time",
            Self::Precise => "precise",
            Self::Casual => "casual",
            Self::Custom => "custom",
        }
    }

    fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl FromStr for PlaytimeFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|f| f.key() == s)
            .copied()
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// 最新视频文本格式（TikTok 与 YouTube 共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoTextFormat {
    #[default]
    Default,
    Short,
    WithEmoji,
    Custom,
}

impl TextFormat for VideoTextFormat {
    fn key(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Short => "short",
            Self::WithEmoji => "with-emoji",
            Self::Custom => "custom",
        }
    }

    fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl FromStr for VideoTextFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "short" => Ok(Self::Short),
            "with-emoji" => Ok(Self::WithEmoji),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}
