//! 句子/分句切分
//!
//! 每个分句成为一个片段并标注其后的停顿：
//! 1. 句末标点（连续的算一个）和换行切出句子
//! 2. 句子内按逗号切出分句，非最后一个为 Medium，最后一个为 Long
//! 3. 超出长度上限的分句按词折行，每行为 Short

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::parts::{PauseClass, VoicePart};

/// 默认分句长度上限（字符）
pub const DEFAULT_CLAUSE_LIMIT: usize = 60;

/// 可配置范围
pub const MIN_CLAUSE_LIMIT: usize = 60;
pub const MAX_CLAUSE_LIMIT: usize = 250;

static FLATTEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-]").unwrap());

/// 检查是否为强分隔符（句末标点与换行，总是分割）
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!' | '\n' | '\r')
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let run_ends = chars.peek().map_or(true, |next| !is_strong_delimiter(*next));
        if is_strong_delimiter(ch) && run_ends {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

/// 贪心折行，每行不超过 `limit` 个字符（单个超长词独占一行）
fn wrap(clause: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in clause.split(' ').filter(|w| !w.is_empty()) {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_part(part: &VoicePart, limit: usize) -> Vec<VoicePart> {
    let mut out = Vec::new();

    for sentence in split_sentences(&part.value) {
        let sentence = FLATTEN.replace_all(&sentence, " ");
        let clauses: Vec<&str> = sentence
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let last = clauses.len().saturating_sub(1);

        for (i, clause) in clauses.into_iter().enumerate() {
            if clause.chars().count() > limit {
                out.extend(
                    wrap(clause, limit)
                        .into_iter()
                        .map(|chunk| part.with_value(chunk).with_pause(PauseClass::Short)),
                );
            } else {
                let pause = if i == last {
                    PauseClass::Long
                } else {
                    PauseClass::Medium
                };
                out.push(part.with_value(clause).with_pause(pause));
            }
        }
    }
    out
}

/// 预录片段原样通过，音色与类型随片段保留
pub fn split_clauses(parts: Vec<VoicePart>, limit: usize) -> Vec<VoicePart> {
    parts
        .into_iter()
        .flat_map(|part| {
            if part.voice.is_reader() {
                split_part(&part, limit)
            } else {
                vec![part]
            }
        })
        .collect()
}
