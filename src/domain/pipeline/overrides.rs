//! 读音覆盖提取
//!
//! 反引号包裹的文本按原样读出，`\` 转义下一个字符

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::parts::{PartType, Voice, VoicePart};

static OVERRIDE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s|.,\-]").unwrap());

/// 切出覆盖片段，未闭合的反引号之后按普通文本处理
pub fn extract_overrides(text: &str, voice: &Arc<Voice>) -> Vec<VoicePart> {
    let mut parts = Vec::new();
    let mut segment_start = 0;
    let mut open: Option<usize> = None;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '`' => match open {
                None => open = Some(i),
                Some(start) => {
                    let before = &text[segment_start..start];
                    if !before.is_empty() {
                        parts.push(VoicePart::new(before, voice.clone(), PartType::Raw));
                    }
                    let inner = text[start + 1..i].to_lowercase();
                    let cleaned = OVERRIDE_DISALLOWED.replace_all(&inner, "");
                    parts.push(VoicePart::new(
                        cleaned.into_owned(),
                        voice.clone(),
                        PartType::Override,
                    ));
                    segment_start = i + 1;
                    open = None;
                }
            },
            _ => {}
        }
    }

    let rest = &text[segment_start..];
    if !rest.is_empty() {
        parts.push(VoicePart::new(rest, voice.clone(), PartType::Raw));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parts::SynthesisParameters;

    fn voice() -> Arc<Voice> {
        Arc::new(Voice::reader("ann", SynthesisParameters::default()))
    }

    fn summary(parts: &[VoicePart]) -> Vec<(&str, PartType)> {
        parts.iter().map(|p| (p.value.as_str(), p.part_type)).collect()
    }

    #[test]
    fn test_plain_text_is_single_raw_part() {
        let parts = extract_overrides("hello world", &voice());
        assert_eq!(summary(&parts), vec![("hello world", PartType::Raw)]);
    }

    #[test]
    fn test_override_span() {
        let parts = extract_overrides("say `Ku|Ro$` now", &voice());
        assert_eq!(
            summary(&parts),
            vec![
                ("say ", PartType::Raw),
                ("ku|ro", PartType::Override),
                (" now", PartType::Raw),
            ]
        );
    }

    #[test]
    fn test_escaped_backtick_is_not_a_delimiter() {
        let parts = extract_overrides(r"a \` b `c`", &voice());
        assert_eq!(
            summary(&parts),
            vec![(r"a \` b ", PartType::Raw), ("c", PartType::Override)]
        );
    }

    #[test]
    fn test_unterminated_backtick_stays_raw() {
        let parts = extract_overrides("one `two three", &voice());
        assert_eq!(summary(&parts), vec![("one `two three", PartType::Raw)]);
    }

    #[test]
    fn test_adjacent_overrides() {
        let parts = extract_overrides("`a``b`", &voice());
        assert_eq!(
            summary(&parts),
            vec![("a", PartType::Override), ("b", PartType::Override)]
        );
    }
}
