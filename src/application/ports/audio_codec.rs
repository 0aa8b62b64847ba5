//! Audio Codec Port - 音频编解码抽象

use thiserror::Error;

use crate::domain::PcmClip;

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Audio Codec Port
///
/// CPU 密集且无 IO，接口保持同步
pub trait AudioCodecPort: Send + Sync {
    /// 解码为 PCM
    fn decode(&self, data: &[u8]) -> Result<PcmClip, CodecError>;

    /// 按 clip 自身的格式编码
    fn encode(&self, clip: &PcmClip) -> Result<Vec<u8>, CodecError>;

    /// HTTP Content-Type
    fn content_type(&self) -> &'static str;
}
