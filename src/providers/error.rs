//! 提供者错误类型

use thiserror::Error;

use crate::kv::KvError;

/// 错误类别，路由层据此选择 HTTP 状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Upstream,
    Parse,
    NotFound,
    Cache,
    InvalidInput,
}

/// 提供者与读穿缓存返回的错误
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("上游接口错误 [{provider}] (状态码 {status:?}): {message}")]
    Upstream {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("响应解析失败 [{provider}]: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    #[error("未找到数据 [{provider}]: {message}")]
    NotFound {
        provider: &'static str,
        message: String,
    },

    #[error("缓存错误: {0}")]
    Cache(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// 上游返回非成功状态码
    pub fn upstream_status(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        ProviderError::Upstream {
            provider,
            status: Some(status),
            message: message.into(),
        }
    }

    /// 传输层失败（连接、超时等）
    pub fn transport(provider: &'static str, err: impl std::fmt::Display) -> Self {
        ProviderError::Upstream {
            provider,
            status: None,
            message: err.to_string(),
        }
    }

    pub fn parse(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Parse {
            provider,
            message: message.into(),
        }
    }

    pub fn not_found(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::NotFound {
            provider,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Upstream { .. } => ErrorKind::Upstream,
            ProviderError::Parse { .. } => ErrorKind::Parse,
            ProviderError::NotFound { .. } => ErrorKind::NotFound,
            ProviderError::Cache(_) => ErrorKind::Cache,
            ProviderError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<KvError> for ProviderError {
    fn from(err: KvError) -> Self {
        ProviderError::Cache(err.to_string())
    }
}
