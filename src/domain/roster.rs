//! 音色名单
//!
//! 从目录快照中解析出单次请求的默认音色和允许列表（默认音色总在第一位）

use std::sync::Arc;
use thiserror::Error;

use super::parts::Voice;

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("Voice catalog is empty")]
    EmptyCatalog,

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Default voice must be a reader voice: {0}")]
    DefaultNotReader(String),
}

/// 单次请求可用的音色
#[derive(Debug, Clone)]
pub struct VoiceRoster {
    voices: Vec<Arc<Voice>>,
}

impl VoiceRoster {
    /// 解析音色名单
    ///
    /// - `allowed` 为 None 时允许目录里的全部音色
    /// - `default` 为 None 时取允许列表中第一个朗读音色
    pub fn resolve(
        catalog: &[Voice],
        default: Option<&str>,
        allowed: Option<&[String]>,
    ) -> Result<Self, RosterError> {
        if catalog.is_empty() {
            return Err(RosterError::EmptyCatalog);
        }

        let find = |name: &str| {
            let key = name.to_lowercase();
            catalog
                .iter()
                .find(|v| v.key() == key)
                .cloned()
                .ok_or_else(|| RosterError::UnknownVoice(name.to_string()))
        };

        let mut voices: Vec<Voice> = match allowed {
            Some(names) => names.iter().map(|n| find(n)).collect::<Result<_, _>>()?,
            None => catalog.to_vec(),
        };

        let default_voice = match default {
            Some(name) => find(name)?,
            None => voices
                .iter()
                .find(|v| v.is_reader())
                .cloned()
                .ok_or(RosterError::EmptyCatalog)?,
        };
        if !default_voice.is_reader() {
            return Err(RosterError::DefaultNotReader(default_voice.name));
        }

        voices.retain(|v| v != &default_voice);
        voices.insert(0, default_voice);

        Ok(Self {
            voices: voices.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn default_voice(&self) -> &Arc<Voice> {
        &self.voices[0]
    }

    /// 指令匹配顺序
    pub fn voices(&self) -> &[Arc<Voice>] {
        &self.voices
    }
}
