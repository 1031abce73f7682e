use std::fmt;

// =========================================================
// 失败分类
// =========================================================

/// 请求失败的底层原因
///
/// 对调用方统一暴露为 [`RequestFailed`]，分类只用于诊断和少数策略判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 网络不可达 / 请求未能发出
    Transport,
    /// 服务端返回非 2xx
    Rejected,
    /// 响应体无法解析（或请求体无法序列化）
    Decode,
    /// 调用方取消了等待
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Rejected => "rejected",
            FailureKind::Decode => "decode",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    pub operation: String,
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

/// 网关与资源客户端唯一的失败类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailed {
    pub kind: FailureKind,
    /// 服务端状态码（传输失败/取消时为空）
    pub status: Option<u16>,
    pub message: String,
    spans: Vec<ErrorSpan>,
}

const GENERIC_FAILURE_NOTICE: &str = "The request could not be completed. Please try again.";

impl RequestFailed {
    pub fn new(kind: FailureKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, None, message)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Rejected, Some(status), message)
    }

    pub fn decode(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, status, message)
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, None, "request cancelled")
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 401：凭据无效或已过期
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// 资源操作失败时面向用户的提示：始终是通用提示，不透出后端原文
    pub fn user_message(&self) -> &str {
        GENERIC_FAILURE_NOTICE
    }

    /// 认证操作（登录、注册等）失败时面向用户的提示
    ///
    /// 服务端拒绝时透出服务端消息（如 "Invalid email or password"），其余情况给出通用提示。
    pub fn auth_message(&self) -> &str {
        match self.kind {
            FailureKind::Rejected => &self.message,
            _ => GENERIC_FAILURE_NOTICE,
        }
    }
}

impl fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{} {}] {}", self.kind.as_str(), status, self.message)?,
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message)?,
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for RequestFailed {}

pub type RequestResult<T> = std::result::Result<T, RequestFailed>;

// =========================================================
// 传输层与配置错误
// =========================================================

/// 传输适配器返回的错误
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,
    #[error("API base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
    #[error("token storage key must not be empty")]
    EmptyStorageKey,
    #[error("unknown sensor name route: {0}")]
    UnknownSensorNameRoute(String),
    #[error("invalid config: {0}")]
    Parse(String),
}
