//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::{PartType, PauseClass, TextSource, VoiceKind, VoicePart};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Text DTOs
// ============================================================================

/// 合成 / 规范化请求
#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    pub text: String,
    #[serde(default)]
    pub source: TextSource,
    #[serde(default)]
    pub default_voice: Option<String>,
    #[serde(default)]
    pub voices: Option<Vec<String>>,
}

/// 规范化后的片段
#[derive(Debug, Serialize)]
pub struct VoicePartResponse {
    pub index: usize,
    pub voice: String,
    pub kind: VoiceKind,
    pub text: String,
    pub part_type: PartType,
    pub pause: PauseClass,
}

impl From<&VoicePart> for VoicePartResponse {
    fn from(part: &VoicePart) -> Self {
        Self {
            index: part.index,
            voice: part.voice.name.clone(),
            kind: part.voice.kind,
            text: part.value.clone(),
            part_type: part.part_type,
            pause: part.pause,
        }
    }
}
