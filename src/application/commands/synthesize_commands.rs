//! Synthesis Commands - 文本合成命令

use tokio_util::sync::CancellationToken;

use crate::domain::TextSource;

/// 合成一条消息
#[derive(Debug, Clone, Default)]
pub struct SynthesizeCommand {
    pub text: String,
    pub source: TextSource,
    /// 默认音色名，未指定时取名单中第一个朗读音色
    pub default_voice: Option<String>,
    /// 允许切换的音色（按匹配顺序），未指定时允许目录中全部音色
    pub voices: Option<Vec<String>>,
    /// 调用方取消信号
    pub cancel: CancellationToken,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    pub audio: Vec<u8>,
    pub content_type: &'static str,
    pub duration_ms: u64,
    /// 规范化得到的片段数
    pub parts: usize,
}
