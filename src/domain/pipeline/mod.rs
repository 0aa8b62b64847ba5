//! 文本规范化流水线
//!
//! 预处理 → 读音覆盖 → 音色切换 → 货币 → 数字 → 缩写 → 单词读音 → 分句 → 字符清理
//!
//! 各阶段都是全函数：无法规范化的输入原样保留，从不失败

mod abbreviations;
mod currency;
mod numbers;
mod overrides;
mod prepare;
mod sentences;
mod strip;
mod voices;
mod words;

use std::sync::Arc;

pub use abbreviations::expand_abbreviations;
pub use currency::normalize_currency;
pub use numbers::{normalize_numbers, read_cardinal, MAGNITUDES};
pub use overrides::extract_overrides;
pub use prepare::{prepare, TextSource};
pub use sentences::{split_clauses, DEFAULT_CLAUSE_LIMIT, MAX_CLAUSE_LIMIT, MIN_CLAUSE_LIMIT};
pub use strip::{sanitize, sanitize_parts};
pub use voices::segment_voices;
pub use words::map_words;

use super::lexicon::Lexicon;
use super::parts::VoicePart;
use super::roster::VoiceRoster;

/// 默认超长 token 阈值（字符）
pub const DEFAULT_LONG_TOKEN_LIMIT: usize = 20;

/// 默认音色切换上限
pub const DEFAULT_MAX_VOICE_SWAPS: usize = 5;

/// 流水线参数
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub clause_limit: usize,
    pub max_voice_swaps: Option<usize>,
    pub long_token_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            clause_limit: DEFAULT_CLAUSE_LIMIT,
            max_voice_swaps: Some(DEFAULT_MAX_VOICE_SWAPS),
            long_token_limit: DEFAULT_LONG_TOKEN_LIMIT,
        }
    }
}

/// 按顺序运行全部阶段
#[derive(Debug, Clone)]
pub struct TextPipeline {
    lexicon: Arc<Lexicon>,
    options: PipelineOptions,
}

impl TextPipeline {
    pub fn new(lexicon: Arc<Lexicon>, options: PipelineOptions) -> Self {
        Self { lexicon, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// 规范化文本，返回连续编号（0..n-1）的片段序列
    ///
    /// 清理后为空的朗读片段会被丢弃；预录片段标记保留
    pub fn process(&self, text: &str, source: TextSource, roster: &VoiceRoster) -> Vec<VoicePart> {
        let prepared = prepare(text, source);

        let parts = extract_overrides(&prepared, roster.default_voice());
        let parts = segment_voices(parts, roster, self.options.max_voice_swaps);
        let parts = normalize_currency(parts);
        let parts = normalize_numbers(parts);
        let parts = expand_abbreviations(parts, &self.lexicon);
        let parts = map_words(parts, &self.lexicon, self.options.long_token_limit);
        let parts = split_clauses(parts, self.options.clause_limit);
        let parts = sanitize_parts(parts);

        parts
            .into_iter()
            .filter(|p| !p.voice.is_reader() || !p.value.is_empty())
            .enumerate()
            .map(|(index, mut part)| {
                part.index = index;
                part
            })
            .collect()
    }
}
