//! 消息预处理
//!
//! HTML 实体反转义、去除 cheer 表情、小写化

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// 文本来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// 普通消息 / 打赏留言
    #[default]
    Message,
    /// Bits cheer，带 cheermote token
    Cheer,
}

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").unwrap());

static CHEERMOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:cheer|biblethump|cheerwhal|corgo|uni|showlove|party|seemsgood|pride|kappa|frankerz|heyguys|dansgame|elegiggle|trihard|kreygasm|4head|swiftrage|notlikethis|failfish|vohiyo|pjsalt|mrdestructoid|bday|ripcheer|shamrock)[0-9]+\b",
    )
    .unwrap()
});

fn decode_entity(caps: &Captures) -> String {
    let body = &caps[1];
    let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        match body {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            "pound" => Some('£'),
            "euro" => Some('€'),
            "dollar" => Some('$'),
            _ => None,
        }
    };
    decoded.map_or_else(|| caps[0].to_string(), String::from)
}

/// 未知实体保持原样
pub fn unescape_html(text: &str) -> String {
    ENTITY.replace_all(text, decode_entity).into_owned()
}

pub fn strip_cheermotes(text: &str) -> String {
    CHEERMOTE.replace_all(text, "").into_owned()
}

pub fn prepare(text: &str, source: TextSource) -> String {
    let text = unescape_html(text);
    let text = match source {
        TextSource::Cheer => strip_cheermotes(&text),
        TextSource::Message => text,
    };
    text.trim().to_lowercase()
}
