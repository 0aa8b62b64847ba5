//! Normalize Queries - 规范化预览

use crate::domain::TextSource;

/// 只运行文本流水线，不派发任何任务
#[derive(Debug, Clone, Default)]
pub struct NormalizeQuery {
    pub text: String,
    pub source: TextSource,
    pub default_voice: Option<String>,
    pub voices: Option<Vec<String>>,
}
