//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use std::time::Duration;

use crate::env::{EnvConfig, EnvError, EnvResult};
use crate::providers::{SteamConfig, TikTokConfig, YoutubeConfig};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// CORS 允许的源，包含 `*` 时不限制
    pub cors_origins: Vec<String>,
    /// 上游数据缓存时间
    pub cache_ttl: Duration,
    /// 缓存键前缀
    pub cache_namespace: String,
    /// Redis 地址，未设置时使用内存存储
    pub redis_url: Option<String>,
    /// 上游请求超时
    pub http_timeout: Duration,
    pub steam: SteamConfig,
    pub tiktok: TikTokConfig,
    pub youtube: YoutubeConfig,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self::from(EnvConfig::from_env()?))
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "SPARK_BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "SPARK_PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.cache_ttl.is_zero() {
            return Err(EnvError {
                variable: "SPARK_CACHE_TTL".to_string(),
                message: "TTL must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// 是否允许任意来源
    pub fn cors_is_permissive(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl From<EnvConfig> for WebConfig {
    fn from(env: EnvConfig) -> Self {
        Self {
            bind_addr: env.bind_address,
            port: env.port,
            cors_origins: env.cors_origins,
            cache_ttl: env.cache_ttl,
            cache_namespace: env.cache_namespace,
            redis_url: env.redis_url,
            http_timeout: env.http_timeout,
            steam: SteamConfig {
                api_key: env.steam_api_key,
                base_url: env.steam_base_url,
            },
            tiktok: TikTokConfig {
                client_key: env.tiktok_client_key,
                client_secret: env.tiktok_client_secret,
                base_url: env.tiktok_base_url,
            },
            youtube: YoutubeConfig {
                api_key: env.youtube_api_key,
                base_url: env.youtube_base_url,
            },
        }
    }
}
