//! 音色切换分段
//!
//! 两种指令，按名单顺序逐个匹配，先匹配者生效：
//! - `(name)` 前缀：插入一个预录片段位置，随后继续当前朗读音色
//! - `name:` 前缀：之后的所有 token 切换到该朗读音色

use std::sync::Arc;

use crate::domain::parts::{PartType, Voice, VoicePart};
use crate::domain::roster::VoiceRoster;

/// 单个 token 的指令解析结果
enum Directive<'t> {
    Clip(Arc<Voice>, &'t str),
    Switch(Arc<Voice>, &'t str),
    Text(&'t str),
}

fn parse_directive<'t>(token: &'t str, roster: &VoiceRoster) -> Directive<'t> {
    for voice in roster.voices() {
        let key = voice.key();
        if voice.is_reader() {
            if let Some(rest) = token.strip_prefix(key.as_str()).and_then(|r| r.strip_prefix(':')) {
                return Directive::Switch(voice.clone(), rest);
            }
        } else if let Some(rest) = token
            .strip_prefix('(')
            .and_then(|r| r.strip_prefix(key.as_str()))
            .and_then(|r| r.strip_prefix(')'))
        {
            return Directive::Clip(voice.clone(), rest);
        }
    }
    Directive::Text(token)
}

/// 折叠状态：当前音色、已切换次数、已产出片段、当前累积的 token
struct Fold {
    current: Arc<Voice>,
    swaps: usize,
    max_swaps: Option<usize>,
    parts: Vec<VoicePart>,
    pending: Vec<String>,
}

impl Fold {
    fn can_swap(&self) -> bool {
        self.max_swaps.map_or(true, |max| self.swaps < max)
    }

    fn flush(&mut self, part_type: PartType) {
        let text = self.pending.join(" ");
        self.pending.clear();
        let text = text.trim();
        if !text.is_empty() {
            self.parts
                .push(VoicePart::new(text, self.current.clone(), part_type));
        }
    }

    fn accumulate(&mut self, text: &str) {
        if !text.is_empty() {
            self.pending.push(text.to_string());
        }
    }

    fn step(mut self, token: &str, part_type: PartType, roster: &VoiceRoster) -> Self {
        match parse_directive(token, roster) {
            Directive::Text(text) => self.accumulate(text),
            Directive::Clip(voice, rest) if self.can_swap() => {
                self.flush(part_type);
                self.parts.push(VoicePart::new("", voice, part_type));
                self.swaps += 1;
                self.accumulate(rest);
            }
            Directive::Switch(voice, rest) if voice == self.current => {
                self.accumulate(rest);
            }
            Directive::Switch(voice, rest) if self.can_swap() => {
                self.flush(part_type);
                self.current = voice;
                self.swaps += 1;
                self.accumulate(rest);
            }
            _ => {
                tracing::trace!(token, swaps = self.swaps, "Voice swap limit reached");
                self.accumulate(token);
            }
        }
        self
    }
}

/// 按音色指令切分片段
///
/// 当前音色跨片段保持；达到 `max_swaps` 之后的指令按普通文本处理
pub fn segment_voices(
    parts: Vec<VoicePart>,
    roster: &VoiceRoster,
    max_swaps: Option<usize>,
) -> Vec<VoicePart> {
    let init = Fold {
        current: roster.default_voice().clone(),
        swaps: 0,
        max_swaps,
        parts: Vec::new(),
        pending: Vec::new(),
    };

    let fold = parts.into_iter().fold(init, |state, part| {
        let part_type = part.part_type;
        let mut state = part
            .value
            .split(' ')
            .filter(|t| !t.is_empty())
            .fold(state, |state, token| state.step(token, part_type, roster));
        state.flush(part_type);
        state
    });

    fold.parts
}
