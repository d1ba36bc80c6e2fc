//! Gateway error taxonomy / 网关错误分类
//!
//! Every failure of the search pipeline is returned as one of these kinds.
//! An empty result list is a success, never an error.

use std::fmt;
use thiserror::Error;

/// Transport failure kind / 传输失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Could not connect to the engine / 无法连接
    Connect,
    /// Request exceeded its timeout / 请求超时
    Timeout,
    /// Caller cancelled the request / 调用方取消
    Cancelled,
    /// Any other transport-level failure / 其他传输错误
    Other,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportFailure::Connect => "connect",
            TransportFailure::Timeout => "timeout",
            TransportFailure::Cancelled => "cancelled",
            TransportFailure::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request rejected by local validation before any network call / 本地校验失败
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network failure, timeout or cancellation / 网络、超时或取消
    #[error("Transport failure ({kind}): {message}")]
    Transport {
        kind: TransportFailure,
        message: String,
    },

    /// Engine answered with a non-2xx status / 搜索引擎返回非成功状态
    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Engine response did not match the hit envelope / 响应格式不符
    #[error("Malformed upstream response: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn transport(kind: TransportFailure, message: impl Into<String>) -> Self {
        GatewayError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Whether a caller-side policy may retry this failure unchanged.
    ///
    /// Only transport failures qualify, and a cancelled call stays cancelled.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport { kind, .. } if *kind != TransportFailure::Cancelled
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport {
                kind: TransportFailure::Timeout,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportFailure::Timeout
        } else if e.is_connect() {
            TransportFailure::Connect
        } else {
            TransportFailure::Other
        };
        GatewayError::transport(kind, e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
