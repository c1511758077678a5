//! 错误类型
//!
//! `ApiError` 覆盖 REST 调用的全部失败路径，`ChannelError` 覆盖实时告警通道。

use thiserror::Error;

/// REST 调用错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401: 会话失效或令牌无效
    #[error("认证失败 (401): {body}")]
    Unauthorized { body: String },
    /// 其他非 2xx 状态码
    #[error("请求失败 ({status}): {body}")]
    Status { status: u16, body: String },
    /// 网络请求失败
    #[error("网络错误: {0}")]
    Network(String),
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuild(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl ApiError {
    /// 按状态码归类失败响应
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 401 {
            ApiError::Unauthorized { body }
        } else {
            ApiError::Status { status, body }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// 获取对应的 HTTP 状态码（传输层错误没有状态码）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 提取后端 `{"detail": ...}` 中的说明，供页面直接展示
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 实时告警通道错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    #[error("连接失败: {0}")]
    Connect(String),
    #[error("传输错误: {0}")]
    Transport(String),
}
