//! 统一的环境变量管理系统
//!
//! 每个变量是一个实现 `EnvVar` 的零大小类型，集中声明名称、默认值、说明与
//! 校验规则，最终汇总为 `EnvConfig`。

use std::env;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// 环境变量解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("环境变量 '{variable}': {message}")]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl EnvError {
    fn new(variable: &str, message: impl Into<String>) -> Self {
        Self {
            variable: variable.to_string(),
            message: message.into(),
        }
    }
}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::DEFAULT.ok_or_else(|| {
                EnvError::new(Self::NAME, "Required environment variable not set")
            }),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 字符串变量未设置时解析默认文本
fn get_or_parse<V: EnvVar<String>>(default: &str) -> EnvResult<String> {
    match env::var(V::NAME) {
        Ok(value) => V::parse(&value),
        Err(_) => V::parse(default),
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 应用运行模式
    pub struct Mode;
    impl EnvVar<String> for Mode {
        const NAME: &'static str = "SPARK_MODE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Application mode: development, staging, production";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>("production")
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                "development" | "dev" => Ok("development".to_string()),
                "staging" | "stage" => Ok("staging".to_string()),
                "production" | "prod" => Ok("production".to_string()),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!("Invalid mode '{}'. Use: development, staging, production", value),
                )),
            }
        }
    }

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "SPARK_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>("info")
        }

        fn parse(value: &str) -> EnvResult<String> {
            let level = value.trim().to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
                _ => Err(EnvError::new(
                    Self::NAME,
                    format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                )),
            }
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "SPARK_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>("127.0.0.1")
        }

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError::new(Self::NAME, "Address cannot be empty"));
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "SPARK_PORT";
        const DEFAULT: Option<u16> = Some(4343);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(EnvError::new(Self::NAME, "Must be a valid port number (1-65535)")),
            }
        }
    }

    /// CORS允许的源
    pub struct CorsOrigins;
    impl EnvVar<Vec<String>> for CorsOrigins {
        const NAME: &'static str = "SPARK_CORS_ORIGINS";
        const DEFAULT: Option<Vec<String>> = None;
        const DESCRIPTION: &'static str = "CORS allowed origins (comma-separated, * for any)";

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(vec!["*".to_string()]),
            }
        }

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            let origins: Vec<String> = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if origins.is_empty() {
                return Err(EnvError::new(Self::NAME, "At least one origin is required"));
            }
            Ok(origins)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "SPARK_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(900));
        const DESCRIPTION: &'static str = "Cache TTL in seconds (1 to 604800)";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 86400 * 7)
        }
    }

    /// 键前缀
    pub struct Namespace;
    impl EnvVar<String> for Namespace {
        const NAME: &'static str = "SPARK_CACHE_NAMESPACE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Key prefix for cache entries";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>("spark")
        }

        fn parse(value: &str) -> EnvResult<String> {
            let ns = value.trim();
            if ns.chars().any(char::is_whitespace) {
                return Err(EnvError::new(Self::NAME, "Namespace cannot contain whitespace"));
            }
            Ok(ns.trim_end_matches(':').to_string())
        }
    }

    /// Redis 连接地址
    pub struct RedisUrl;
    impl EnvVar<Option<String>> for RedisUrl {
        const NAME: &'static str = "SPARK_REDIS_URL";
        const DEFAULT: Option<Option<String>> = Some(None);
        const DESCRIPTION: &'static str = "Redis URL; selects the Redis store when built with the `redis` feature";

        fn parse(value: &str) -> EnvResult<Option<String>> {
            let url = value.trim();
            if url.is_empty() {
                return Ok(None);
            }
            if url.starts_with("redis://") || url.starts_with("rediss://") {
                Ok(Some(url.to_string()))
            } else {
                Err(EnvError::new(Self::NAME, "Redis URL must start with redis:// or rediss://"))
            }
        }
    }
}

/// 上游 HTTP 客户端
pub mod http {
    use super::*;

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "SPARK_HTTP_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Upstream request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 120)
        }
    }
}

/// Steam 接口
pub mod steam {
    use super::*;

    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "STEAM_WEB_API_KEY";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Steam Web API key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "STEAM_API_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Steam Web API base URL";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>(crate::providers::steam::STEAM_API_BASE_URL)
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_base_url(value, Self::NAME)
        }
    }
}

/// TikTok 接口
pub mod tiktok {
    use super::*;

    pub struct ClientKey;
    impl EnvVar<String> for ClientKey {
        const NAME: &'static str = "TIKTOK_CLIENT_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "TikTok client key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    pub struct ClientSecret;
    impl EnvVar<String> for ClientSecret {
        const NAME: &'static str = "TIKTOK_CLIENT_SECRET_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "TikTok client secret";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "TIKTOK_API_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "TikTok API base URL";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>(crate::providers::tiktok::TIKTOK_API_BASE_URL)
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_base_url(value, Self::NAME)
        }
    }
}

/// YouTube 接口
pub mod youtube {
    use super::*;

    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "YOUTUBE_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "YouTube Data API v3 key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "YOUTUBE_API_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "YouTube Data API base URL";

        fn get() -> EnvResult<String> {
            get_or_parse::<Self>(crate::providers::youtube::YOUTUBE_API_BASE_URL)
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_base_url(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_seconds(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|_| EnvError::new(var_name, "Must be a valid number of seconds"))?;

    if seconds < min {
        return Err(EnvError::new(var_name, format!("Value {} is below minimum {}", seconds, min)));
    }
    if seconds > max {
        return Err(EnvError::new(var_name, format!("Value {} exceeds maximum {}", seconds, max)));
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_secret(value: &str, var_name: &str) -> EnvResult<String> {
    let secret = value.trim();
    if secret.is_empty() {
        return Err(EnvError::new(var_name, "Value cannot be empty"));
    }
    Ok(secret.to_string())
}

fn parse_base_url(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| EnvError::new(var_name, format!("Invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(EnvError::new(
            var_name,
            format!("Unsupported scheme '{}', use http:// or https://", other),
        )),
    }
}

/// 按优先级加载 .env 文件，找到第一个存在的文件即停止
pub fn load_dotenv() -> Option<&'static str> {
    let env_files = [".env.local", ".env.development", ".env.production", ".env"];

    for env_file in env_files {
        if !Path::new(env_file).exists() {
            continue;
        }
        match dotenv::from_filename(env_file) {
            Ok(_) => {
                tracing::info!("已加载环境变量文件: {}", env_file);
                return Some(env_file);
            }
            Err(e) => tracing::warn!("无法加载环境变量文件 {}: {}", env_file, e),
        }
    }

    None
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub mode: String,
    pub log_level: String,

    // Web配置
    pub bind_address: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    // 缓存配置
    pub cache_ttl: Duration,
    pub cache_namespace: String,
    pub redis_url: Option<String>,

    // 上游配置
    pub http_timeout: Duration,
    pub steam_api_key: String,
    pub steam_base_url: String,
    pub tiktok_client_key: String,
    pub tiktok_client_secret: String,
    pub tiktok_base_url: String,
    pub youtube_api_key: String,
    pub youtube_base_url: String,
}

impl EnvConfig {
    /// 从环境变量加载配置，缺少必需变量时返回错误
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            mode: core::Mode::get()?,
            log_level: core::LogLevel::get()?,

            bind_address: web::BindAddress::get()?,
            port: web::Port::get()?,
            cors_origins: web::CorsOrigins::get()?,

            cache_ttl: cache::Ttl::get()?,
            cache_namespace: cache::Namespace::get()?,
            redis_url: cache::RedisUrl::get()?,

            http_timeout: http::Timeout::get()?,
            steam_api_key: steam::ApiKey::get()?,
            steam_base_url: steam::BaseUrl::get()?,
            tiktok_client_key: tiktok::ClientKey::get()?,
            tiktok_client_secret: tiktok::ClientSecret::get()?,
            tiktok_base_url: tiktok::BaseUrl::get()?,
            youtube_api_key: youtube::ApiKey::get()?,
            youtube_base_url: youtube::BaseUrl::get()?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.mode == "development"
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn summary(&self) -> String {
        format!(
            "mode={} log={} listen={}:{} cache_ttl={}s namespace={} store={} timeout={}s",
            self.mode,
            self.log_level,
            self.bind_address,
            self.port,
            self.cache_ttl.as_secs(),
            self.cache_namespace,
            if self.redis_url.is_some() { "redis" } else { "memory" },
            self.http_timeout.as_secs(),
        )
    }
}

fn doc_line(docs: &mut String, name: &str, description: &str, default: &str) {
    docs.push_str(&format!("- `{}`: {} (default: {})\n", name, description, default));
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    doc_line(&mut docs, core::Mode::NAME, core::Mode::DESCRIPTION, "production");
    doc_line(&mut docs, core::LogLevel::NAME, core::LogLevel::DESCRIPTION, "info");

    docs.push_str("\n## Web Server Configuration\n\n");
    doc_line(&mut docs, web::BindAddress::NAME, web::BindAddress::DESCRIPTION, "127.0.0.1");
    doc_line(&mut docs, web::Port::NAME, web::Port::DESCRIPTION, "4343");
    doc_line(&mut docs, web::CorsOrigins::NAME, web::CorsOrigins::DESCRIPTION, "*");

    docs.push_str("\n## Cache Configuration\n\n");
    doc_line(&mut docs, cache::Ttl::NAME, cache::Ttl::DESCRIPTION, "900");
    doc_line(&mut docs, cache::Namespace::NAME, cache::Namespace::DESCRIPTION, "spark");
    doc_line(&mut docs, cache::RedisUrl::NAME, cache::RedisUrl::DESCRIPTION, "unset");

    docs.push_str("\n## Upstream Configuration\n\n");
    doc_line(&mut docs, http::Timeout::NAME, http::Timeout::DESCRIPTION, "10");
    doc_line(&mut docs, steam::ApiKey::NAME, steam::ApiKey::DESCRIPTION, "required");
    doc_line(
        &mut docs,
        steam::BaseUrl::NAME,
        steam::BaseUrl::DESCRIPTION,
        crate::providers::steam::STEAM_API_BASE_URL,
    );
    doc_line(&mut docs, tiktok::ClientKey::NAME, tiktok::ClientKey::DESCRIPTION, "required");
    doc_line(&mut docs, tiktok::ClientSecret::NAME, tiktok::ClientSecret::DESCRIPTION, "required");
    doc_line(
        &mut docs,
        tiktok::BaseUrl::NAME,
        tiktok::BaseUrl::DESCRIPTION,
        crate::providers::tiktok::TIKTOK_API_BASE_URL,
    );
    doc_line(&mut docs, youtube::ApiKey::NAME, youtube::ApiKey::DESCRIPTION, "required");
    doc_line(
        &mut docs,
        youtube::BaseUrl::NAME,
        youtube::BaseUrl::DESCRIPTION,
        crate::providers::youtube::YOUTUBE_API_BASE_URL,
    );

    docs
}
