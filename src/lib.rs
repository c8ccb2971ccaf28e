//! # Spark API Library
//!
//! 以本地化文本的形式提供社交与媒体统计数据（Steam 游戏时长、TikTok 与
//! YouTube 最新视频），并通过读穿缓存避免重复调用第三方接口。
//!
//! ## 模块组织
//!
//! - `kv` - 键值存储抽象（内存实现，可选 Redis 实现）
//! - `cache` - 读穿缓存与命中统计
//! - `providers` - 上游数据源（Steam、TikTok、YouTube）
//! - `formatting` - 模板渲染、紧凑数字与时间分解
//! - `i18n` - 语言区域与翻译目录
//! - `env` - 类型安全的环境变量管理
//! - `web` - HTTP 服务（可选）

pub mod cache;
pub mod env;
pub mod formatting;
pub mod i18n;
pub mod kv;
pub mod providers;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use cache::{CacheStats, ReadThroughCache};
pub use i18n::{Locale, LocalizedTranslator, Translator};
pub use kv::{KvNamespace, KvStore, MemoryKvStore, PutOptions};
pub use providers::{Provider, ProviderError, ProviderResult, RemoteSource};
