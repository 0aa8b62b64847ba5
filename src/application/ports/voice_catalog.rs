//! Voice Catalog Port - 音色目录抽象
//!
//! 每次请求读取一份只读快照

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Voice;

/// 目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Voice Catalog Port
#[async_trait]
pub trait VoiceCatalogPort: Send + Sync {
    /// 当前可用音色（顺序即默认匹配顺序）
    async fn snapshot(&self) -> Result<Vec<Voice>, CatalogError>;
}
