//! 单词读音映射
//!
//! 逐 token 查表：首字母缩略词 → 短语表（含单独出现的字母）→ 超长 token 逐字母拼读

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::lexicon::Lexicon;
use crate::domain::parts::VoicePart;

/// 逗号、句点独立成 token
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([.,]+)\s*").unwrap());

fn spell(letters: impl Iterator<Item = char>, lexicon: &Lexicon) -> String {
    letters
        .filter_map(|c| lexicon.letter(c))
        .collect::<Vec<_>>()
        .join(" ")
}

fn pronounce(token: &str, lexicon: &Lexicon, long_token_limit: usize) -> String {
    if lexicon.is_acronym(token) {
        return spell(token.chars(), lexicon);
    }
    if let Some(phrase) = lexicon.phrase(token) {
        return phrase.to_string();
    }
    if token.chars().count() > long_token_limit {
        return spell(token.chars(), lexicon);
    }
    token.to_string()
}

/// 只处理 Raw/Currency 片段
pub fn map_words(parts: Vec<VoicePart>, lexicon: &Lexicon, long_token_limit: usize) -> Vec<VoicePart> {
    parts
        .into_iter()
        .map(|part| {
            if !part.part_type.is_normalizable() {
                return part;
            }
            let spaced = PUNCTUATION.replace_all(&part.value, " $1 ");
            let value = spaced
                .split(' ')
                .map(|token| pronounce(token, lexicon, long_token_limit))
                .collect::<Vec<_>>()
                .join(" ");
            part.with_value(value)
        })
        .collect()
}
