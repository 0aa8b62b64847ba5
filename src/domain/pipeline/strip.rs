//! 字符清理：最终只保留 `[a-z |]`

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::parts::VoicePart;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-]+").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z |]").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 幂等
pub fn sanitize(text: &str) -> String {
    let flattened = SEPARATORS.replace_all(text, " ");
    let kept = DISALLOWED.replace_all(&flattened, "");
    SPACES.replace_all(&kept, " ").trim().to_string()
}

pub fn sanitize_parts(parts: Vec<VoicePart>) -> Vec<VoicePart> {
    parts
        .into_iter()
        .map(|part| {
            let value = sanitize(&part.value);
            part.with_value(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricts_alphabet() {
        assert_eq!(sanitize("hello , world ."), "hello world");
        assert_eq!(sanitize("oh|meg|ga|lul!!"), "oh|meg|ga|lul");
        assert_eq!(sanitize("well-known\n\tthing"), "well known thing");
        assert_eq!(sanitize("Caps 42 ümlaut"), "aps mlaut");
    }

    #[test]
    fn test_idempotent() {
        for input in ["a  - b", " x,y ", "", "kek double|you .", "--"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }
}
