//! 应用层错误定义
//!
//! 只有编排器的外部交互会失败，流水线阶段本身总是成功

use std::time::Duration;
use thiserror::Error;

use super::ports::{BusError, CatalogError, CodecError, QueueError};
use crate::domain::RosterError;

/// 合成请求错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 目录或任务队列不可用
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// 返回的负载不是有效音频
    #[error("Failed to decode response {correlation_id}: {reason}")]
    DecodeFailure {
        correlation_id: String,
        reason: String,
    },

    /// 截止时间内未收齐响应
    #[error("Timed out after {waited:?} with {outstanding} responses outstanding")]
    Timeout { waited: Duration, outstanding: usize },

    /// 调用方取消
    #[error("Request cancelled")]
    Cancelled,

    /// 请求本身无效
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 解复用任务已停止
    #[error("Response bus closed")]
    BusClosed,

    /// 拼接结果无法编码
    #[error("Failed to encode output: {0}")]
    Encoding(String),
}

impl SynthesisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn decode(correlation_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            correlation_id: correlation_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for SynthesisError {
    fn from(err: CatalogError) -> Self {
        Self::DependencyUnavailable(err.to_string())
    }
}

impl From<QueueError> for SynthesisError {
    fn from(err: QueueError) -> Self {
        Self::DependencyUnavailable(err.to_string())
    }
}

impl From<BusError> for SynthesisError {
    fn from(err: BusError) -> Self {
        match err {
            BusError::Closed => Self::BusClosed,
            other => Self::DependencyUnavailable(other.to_string()),
        }
    }
}

impl From<RosterError> for SynthesisError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::EmptyCatalog => Self::DependencyUnavailable(err.to_string()),
            other => Self::InvalidRequest(other.to_string()),
        }
    }
}

impl From<CodecError> for SynthesisError {
    fn from(err: CodecError) -> Self {
        Self::Encoding(err.to_string())
    }
}
