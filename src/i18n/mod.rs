//! 国际化
//!
//! - `locale` - 语言区域解析与复数规则
//! - `translator` - 翻译目录与插值

pub mod locale;
pub mod translator;

pub use locale::{Locale, PluralCategory};
pub use translator::{CatalogError, LocalizedTranslator, Translator};
