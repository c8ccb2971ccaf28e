//! 语言区域标签与复数规则

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// 支持的语言区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "pt-BR")]
    PtBr,
}

/// CLDR 复数类别（本服务只用到两类）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    One,
    Other,
}

impl PluralCategory {
    pub fn suffix(&self) -> &'static str {
        match self {
            PluralCategory::One => "one",
            PluralCategory::Other => "other",
        }
    }
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::PtBr];

    /// BCP 47 标签
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::PtBr => "pt-BR",
        }
    }

    fn primary_language(&self) -> &'static str {
        match self {
            Locale::EnUs => "en",
            Locale::PtBr => "pt",
        }
    }

    /// 解析语言标签，先精确匹配（忽略大小写），再按主语言匹配
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-");
        if tag.is_empty() {
            return None;
        }

        if let Some(exact) = Self::ALL.iter().find(|l| l.tag().eq_ignore_ascii_case(&tag)) {
            return Some(*exact);
        }

        let primary = tag.split('-').next().unwrap_or_default();
        Self::ALL
            .iter()
            .find(|l| l.primary_language().eq_ignore_ascii_case(primary))
            .copied()
    }

    /// 按 q 值从 `Accept-Language` 中选出第一个支持的语言
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((tag, quality))
            })
            .collect();

        // 稳定排序保持同权重标签的原始顺序
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.into_iter().find_map(|(tag, _)| Self::from_tag(tag))
    }

    /// 整数的复数类别
    pub fn plural_category(&self, n: i64) -> PluralCategory {
        match self {
            Locale::EnUs if n == 1 => PluralCategory::One,
            Locale::PtBr if n == 0 || n == 1 => PluralCategory::One,
            _ => PluralCategory::Other,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("不支持的语言: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("en-US"), Some(Locale::EnUs));
        assert_eq!(Locale::from_tag("pt-br"), Some(Locale::PtBr));
        assert_eq!(Locale::from_tag("pt_BR"), Some(Locale::PtBr));
        assert_eq!(Locale::from_tag("pt"), Some(Locale::PtBr));
        assert_eq!(Locale::from_tag("en-GB"), Some(Locale::EnUs));
        assert_eq!(Locale::from_tag("fr-FR"), None);
        assert_eq!(Locale::from_tag(""), None);
    }

    #[test]
    fn test_accept_language_respects_quality() {
        assert_eq!(
            Locale::from_accept_language("fr-FR, en;q=0.5, pt-BR;q=0.9"),
            Some(Locale::PtBr)
        );
        assert_eq!(Locale::from_accept_language("de, *;q=0.1"), None);
        assert_eq!(Locale::from_accept_language("en-GB,pt;q=0"), Some(Locale::EnUs));
    }

    #[test]
    fn test_plural_rules() {
        assert_eq!(Locale::EnUs.plural_category(1), PluralCategory::One);
        assert_eq!(Locale::EnUs.plural_category(0), PluralCategory::Other);
        assert_eq!(Locale::PtBr.plural_category(0), PluralCategory::One);
        assert_eq!(Locale::PtBr.plural_category(1), PluralCategory::One);
        assert_eq!(Locale::PtBr.plural_category(2), PluralCategory::Other);
    }
}
