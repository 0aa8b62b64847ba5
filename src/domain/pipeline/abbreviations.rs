//! 缩写展开

use crate::domain::lexicon::Lexicon;
use crate::domain::parts::VoicePart;

/// 整词、大小写不敏感，吞掉可选的末尾句点
pub fn expand_abbreviations(parts: Vec<VoicePart>, lexicon: &Lexicon) -> Vec<VoicePart> {
    let Some(pattern) = lexicon.abbreviation_pattern() else {
        return parts;
    };

    parts
        .into_iter()
        .map(|part| {
            if !part.part_type.is_normalizable() {
                return part;
            }
            let value = pattern.replace_all(&part.value, |caps: &regex::Captures| {
                let matched = &caps[0];
                let key = matched.trim_end_matches('.').to_lowercase();
                lexicon
                    .abbreviation(&key)
                    .map(str::to_string)
                    .unwrap_or_else(|| matched.to_string())
            });
            let value = value.into_owned();
            part.with_value(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parts::{PartType, SynthesisParameters, Voice};
    use std::sync::Arc;

    fn run(text: &str, part_type: PartType) -> String {
        let voice = Arc::new(Voice::reader("ann", SynthesisParameters::default()));
        let parts = vec![VoicePart::new(text, voice, part_type)];
        expand_abbreviations(parts, &Lexicon::default()).remove(0).value
    }

    #[test]
    fn test_expands_whole_words() {
        assert_eq!(run("mr. smith met dr jones", PartType::Raw), "mister smith met doctor jones");
        assert_eq!(run("Mt. Everest", PartType::Raw), "mount Everest");
    }

    #[test]
    fn test_ignores_word_fragments() {
        assert_eq!(run("stop mrsmith", PartType::Raw), "stop mrsmith");
    }

    #[test]
    fn test_longest_alternative_wins() {
        assert_eq!(run("mrs. doe and drs. who", PartType::Raw), "misess doe and doctors who");
    }

    #[test]
    fn test_override_untouched() {
        assert_eq!(run("st. louis", PartType::Override), "st. louis");
    }
}
