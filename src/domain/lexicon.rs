//! 读音词典
//!
//! 缩写表、短语表、首字母缩略词表和单字母读音表。启动时加载一次（内置默认值 +
//! 可选 TOML 覆盖文件），之后只读注入到流水线各阶段

use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use super::pipeline::MAGNITUDES;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon file: {0}")]
    Io(String),

    #[error("Failed to parse lexicon file: {0}")]
    Parse(String),

    #[error("Letter entries must be a single character: {0:?}")]
    InvalidLetter(String),
}

const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("mrs", "misess"),
    ("mr", "mister"),
    ("mt", "mount"),
    ("dr", "doctor"),
    ("st", "saint"),
    ("co", "company"),
    ("jr", "junior"),
    ("maj", "major"),
    ("gen", "general"),
    ("drs", "doctors"),
    ("rev", "reverend"),
    ("lt", "lieutenant"),
    ("hon", "honorable"),
    ("sgt", "sergeant"),
    ("capt", "captain"),
    ("esq", "esquire"),
    ("ltd", "limited"),
    ("col", "colonel"),
    ("ft", "fort"),
];

const DEFAULT_PHRASES: &[(&str, &str)] = &[
    ("totsugeki", "tot|sue|geck|ki"),
    ("bulldog", "bull|dog"),
    ("admiralbulldog", "admiral bull|dog"),
    ("omegalul", "oh|meg|ga|lul"),
    ("xd", "eks|de"),
    ("lacari", "la|car|ee"),
    ("homie", "home|e"),
    ("homies", "home|ees"),
    ("ez", "ease"),
    ("batchest", "bat|chest"),
    ("hecking", "hec|king"),
    ("pepelaugh", "pep|ay|laugh"),
    ("kekw", "kek double|you"),
    ("kekl", "kek el"),
    ("kekinsane", "kek insane"),
    ("wtf", "what the fuck"),
    ("and", "aand"),
    ("fucking", "fucking"),
    ("+", "plus"),
    ("&", "and"),
    ("%", "percent"),
    ("@", "at"),
    ("..", "dot dot"),
    ("...", "dot dot dot"),
];

const DEFAULT_ACRONYMS: &[&str] = &[
    "abc", "xyz", "bkb", "tb", "mkb", "fml", "idk", "og", "eg", "tts", "bf",
];

const DEFAULT_LETTERS: &[(char, &str)] = &[
    ('a', "ay"),
    ('b', "bee"),
    ('c', "see"),
    ('d', "dee"),
    ('e', "ee"),
    ('f', "eff"),
    ('g', "gee"),
    ('h', "aych"),
    ('i', "eye"),
    ('j', "jay"),
    ('k', "kay"),
    ('l', "el"),
    ('m', "em"),
    ('n', "en"),
    ('o', "oh"),
    ('p', "pee"),
    ('q', "kyoo"),
    ('r', "ahr"),
    ('s', "ess"),
    ('t', "tee"),
    ('u', "you"),
    ('v', "vee"),
    ('w', "double|you"),
    ('x', "eks"),
    ('y', "why"),
    ('z', "zee"),
];

/// 单独出现时保持原样的字母
const PRONOUN_I: char = 'i';

/// TOML 覆盖文件格式
#[derive(Debug, Default, Deserialize)]
pub struct LexiconOverlay {
    #[serde(default)]
    pub abbreviations: HashMap<String, String>,
    #[serde(default)]
    pub phrases: HashMap<String, String>,
    #[serde(default)]
    pub acronyms: Vec<String>,
    #[serde(default)]
    pub letters: HashMap<String, String>,
}

/// 只读词典
#[derive(Debug, Clone)]
pub struct Lexicon {
    abbreviations: HashMap<String, String>,
    abbreviation_pattern: Option<Regex>,
    phrases: HashMap<String, String>,
    acronyms: HashSet<String>,
    letters: HashMap<char, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::build(LexiconOverlay::default())
    }
}

impl Lexicon {
    /// 加载词典，`path` 为 None 时只用内置表
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        let overlay = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| LexiconError::Io(format!("{}: {}", path.display(), e)))?;
                Self::parse_overlay(&raw)?
            }
            None => LexiconOverlay::default(),
        };
        Ok(Self::build(overlay))
    }

    /// 解析并校验覆盖表
    pub fn parse_overlay(raw: &str) -> Result<LexiconOverlay, LexiconError> {
        let overlay: LexiconOverlay =
            toml::from_str(raw).map_err(|e| LexiconError::Parse(e.to_string()))?;
        if let Some(bad) = overlay.letters.keys().find(|k| k.chars().count() != 1) {
            return Err(LexiconError::InvalidLetter(bad.clone()));
        }
        Ok(overlay)
    }

    /// 内置表 + 覆盖表
    pub fn build(overlay: LexiconOverlay) -> Self {
        let mut abbreviations: HashMap<String, String> = DEFAULT_ABBREVIATIONS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        abbreviations.extend(
            overlay
                .abbreviations
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v)),
        );

        let mut letters: HashMap<char, String> = DEFAULT_LETTERS
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        letters.extend(
            overlay
                .letters
                .into_iter()
                .filter_map(|(k, v)| k.chars().next().map(|c| (c, v))),
        );

        // 量级词映射到自身，避免长词被逐字母拼读
        let mut phrases: HashMap<String, String> = MAGNITUDES
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| (m.to_string(), m.to_string()))
            .collect();
        // 单独出现的字母按字母读音，代词 i 除外
        phrases.extend(
            letters
                .iter()
                .filter(|(c, _)| **c != PRONOUN_I)
                .map(|(c, v)| (c.to_string(), v.clone())),
        );
        phrases.extend(
            DEFAULT_PHRASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        phrases.extend(overlay.phrases.into_iter().map(|(k, v)| (k.to_lowercase(), v)));

        let mut acronyms: HashSet<String> = DEFAULT_ACRONYMS.iter().map(|a| a.to_string()).collect();
        acronyms.extend(overlay.acronyms.into_iter().map(|a| a.to_lowercase()));

        let abbreviation_pattern = Self::compile_abbreviations(&abbreviations);

        Self {
            abbreviations,
            abbreviation_pattern,
            phrases,
            acronyms,
            letters,
        }
    }

    /// 所有缩写合成一个带词边界的正则，可选吞掉末尾句点
    fn compile_abbreviations(table: &HashMap<String, String>) -> Option<Regex> {
        if table.is_empty() {
            return None;
        }
        let mut keys: Vec<&String> = table.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{})\b\.?", alternation)).ok()
    }

    pub fn abbreviation_pattern(&self) -> Option<&Regex> {
        self.abbreviation_pattern.as_ref()
    }

    pub fn abbreviation(&self, key: &str) -> Option<&str> {
        self.abbreviations.get(key).map(String::as_str)
    }

    pub fn phrase(&self, token: &str) -> Option<&str> {
        self.phrases.get(token).map(String::as_str)
    }

    pub fn is_acronym(&self, token: &str) -> bool {
        self.acronyms.contains(token)
    }

    pub fn letter(&self, c: char) -> Option<&str> {
        self.letters.get(&c).map(String::as_str)
    }
}
