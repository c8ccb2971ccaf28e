//! 翻译器
//!
//! 翻译目录为嵌套 JSON，加载时展平成点分路径键。翻译器在启动时构建一次，
//! 通过应用状态注入，每个请求用 `bind` 绑定自己的语言区域。

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::Locale;
use crate::formatting::Variables;

const EN_US_CATALOG: &str = include_str!("../../locales/en-US.json");
const PT_BR_CATALOG: &str = include_str!("../../locales/pt-BR.json");

/// 翻译目录加载错误
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("翻译目录 {locale} 解析失败: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("翻译目录 {0} 的根节点必须是对象")]
    NotAnObject(Locale),
}

type Catalog = HashMap<String, String>;

/// 多语言翻译器
#[derive(Debug, Clone)]
pub struct Translator {
    catalogs: HashMap<Locale, Catalog>,
    fallback: Locale,
}

impl Translator {
    /// 空翻译器，回退语言为 `fallback`
    pub fn new(fallback: Locale) -> Self {
        Self {
            catalogs: HashMap::new(),
            fallback,
        }
    }

    /// 使用编译时嵌入的目录构建
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::new(Locale::EnUs)
            .with_catalog(Locale::EnUs, EN_US_CATALOG)?
            .with_catalog(Locale::PtBr, PT_BR_CATALOG)
    }

    /// 加载一份 JSON 目录，覆盖该语言已有的同名键
    pub fn with_catalog(mut self, locale: Locale, json: &str) -> Result<Self, CatalogError> {
        let root: JsonValue =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse { locale, source })?;
        if !root.is_object() {
            return Err(CatalogError::NotAnObject(locale));
        }

        let catalog = self.catalogs.entry(locale).or_default();
        flatten("", &root, catalog);
        tracing::debug!("已加载翻译目录 {}: {} 个键", locale, catalog.len());
        Ok(self)
    }

    pub fn fallback(&self) -> Locale {
        self.fallback
    }

    /// 目录中是否存在该键（不考虑回退）
    pub fn has_key(&self, locale: Locale, key: &str) -> bool {
        self.catalogs
            .get(&locale)
            .map(|c| c.contains_key(key))
            .unwrap_or(false)
    }

    /// 翻译并插值
    ///
    /// 依次尝试请求语言与回退语言；存在整数 `count` 变量时先查 `<key>_<复数类别>`。
    /// 所有目录都没有该键时返回键本身。
    pub fn translate(&self, locale: Locale, key: &str, vars: &Variables) -> String {
        let mut locales = vec![locale];
        if locale != self.fallback {
            locales.push(self.fallback);
        }

        for current in locales {
            let Some(catalog) = self.catalogs.get(&current) else {
                continue;
            };

            if let Some(count) = vars.count() {
                let plural_key = format!("{}_{}", key, current.plural_category(count).suffix());
                if let Some(template) = catalog.get(&plural_key) {
                    return interpolate_catalog(template, vars);
                }
            }

            if let Some(template) = catalog.get(key) {
                return interpolate_catalog(template, vars);
            }
        }

        tracing::warn!("缺少翻译键: {} ({})", key, locale);
        key.to_string()
    }

    /// 绑定语言区域
    pub fn bind(&self, locale: Locale) -> LocalizedTranslator<'_> {
        LocalizedTranslator {
            translator: self,
            locale,
        }
    }
}

/// 绑定了语言区域的翻译句柄
#[derive(Debug, Clone, Copy)]
pub struct LocalizedTranslator<'a> {
    translator: &'a Translator,
    locale: Locale,
}

impl<'a> LocalizedTranslator<'a> {
    pub fn t(&self, key: &str, vars: &Variables) -> String {
        self.translator.translate(self.locale, key, vars)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

fn flatten(prefix: &str, value: &JsonValue, out: &mut Catalog) {
    match value {
        JsonValue::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten(&key, v, out);
            }
        }
        JsonValue::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        JsonValue::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn catalog_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("翻译占位符正则表达式无效")
    })
}

fn interpolate_catalog(template: &str, vars: &Variables) -> String {
    catalog_placeholder()
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> Translator {
        Translator::new(Locale::EnUs)
            .with_catalog(
                Locale::EnUs,
                r#"{
                    "greeting": "Hello, {{ name }}!",
                    "only": { "english": "English only" },
                    "items_one": "{{count}} item",
                    "items_other": "{{count}} items"
                }"#,
            )
            .unwrap()
            .with_catalog(
                Locale::PtBr,
                r#"{
                    "greeting": "Olá, {{name}}!",
                    "items_one": "{{count}} item",
                    "items_other": "{{count}} itens"
                }"#,
            )
            .unwrap()
    }

    #[test]
    fn test_translate_interpolates_variables() {
        let t = translator();
        let vars = Variables::new().with("name", "Ana");
        assert_eq!(t.translate(Locale::EnUs, "greeting", &vars), "Hello, Ana!");
        assert_eq!(t.translate(Locale::PtBr, "greeting", &vars), "Olá, Ana!");
    }

    #[test]
    fn test_missing_variable_left_verbatim() {
        let t = translator();
        assert_eq!(
            t.translate(Locale::EnUs, "greeting", &Variables::new()),
            "Hello, {{ name }}!"
        );
    }

    #[test]
    fn test_falls_back_to_default_locale_then_key() {
        let t = translator();
        assert_eq!(
            t.translate(Locale::PtBr, "only.english", &Variables::new()),
            "English only"
        );
        assert_eq!(t.translate(Locale::PtBr, "nope.nothing", &Variables::new()), "nope.nothing");
    }

    #[test]
    fn test_plural_selection() {
        let t = translator();
        let one = Variables::new().with("count", 1i64);
        let zero = Variables::new().with("count", 0i64);
        let many = Variables::new().with("count", 3i64);

        assert_eq!(t.translate(Locale::EnUs, "items", &one), "1 item");
        assert_eq!(t.translate(Locale::EnUs, "items", &zero), "0 items");
        assert_eq!(t.translate(Locale::PtBr, "items", &zero), "0 item");
        assert_eq!(t.translate(Locale::PtBr, "items", &many), "3 itens");
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        assert!(Translator::new(Locale::EnUs).with_catalog(Locale::EnUs, "[1, 2]").is_err());
        assert!(Translator::new(Locale::EnUs).with_catalog(Locale::EnUs, "{").is_err());
    }

    #[test]
    fn test_embedded_catalogs_cover_same_keys() {
        let t = Translator::embedded().unwrap();
        let en = &t.catalogs[&Locale::EnUs];
        let pt = &t.catalogs[&Locale::PtBr];
        for key in en.keys() {
            assert!(pt.contains_key(key), "pt-BR 缺少键: {}", key);
        }
        assert!(t.has_key(Locale::EnUs, "social.steam.hours.standard_other"));
    }

    #[test]
    fn test_bound_translator() {
        let t = translator();
        let bound = t.bind(Locale::PtBr);
        assert_eq!(bound.locale(), Locale::PtBr);
        assert_eq!(bound.t("greeting", &Variables::new().with("name", "Rui")), "Olá, Rui!");
    }
}
