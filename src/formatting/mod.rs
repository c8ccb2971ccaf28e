//! 文本渲染
//!
//! 翻译目录模板与调用方自定义模板是同一概念的两个来源：都用一组命名变量
//! 渲染一段文本。`render` 统一这两条路径。

pub mod numbers;
pub mod timers;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::i18n::LocalizedTranslator;

pub use numbers::compact_number;
pub use timers::{Countdown, CountdownFormat, TimeInfo};

/// 模板变量值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

/// 命名变量集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// 构建式写法
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// 复数选择使用的 `count` 变量
    pub fn count(&self) -> Option<i64> {
        self.get("count").and_then(Value::as_integer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

/// 无法识别的格式名
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的文本格式: {0}")]
pub struct UnknownFormat(pub String);

/// 提供者支持的文本格式
pub trait TextFormat: FromStr<Err = UnknownFormat> + Default + Copy + fmt::Debug + Send + Sync {
    /// 翻译目录中的键后缀
    fn key(&self) -> &'static str;

    fn is_custom(&self) -> bool;
}

/// 模板来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource<'a> {
    /// 翻译目录中的完整键
    Catalog(String),
    /// 调用方提供的 `{name}` 模板
    Custom(&'a str),
}

/// 用变量渲染模板
pub fn render(translator: &LocalizedTranslator<'_>, source: TemplateSource<'_>, vars: &Variables) -> String {
    match source {
        TemplateSource::Catalog(key) => translator.t(&key, vars),
        TemplateSource::Custom(template) => interpolate(template, vars),
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(.*?)\}").expect("占位符正则表达式无效"))
}

/// 替换 `{name}` 占位符，未知变量保持原样
pub fn interpolate(text: &str, vars: &Variables) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
