//! 语音片段与音色模型
//!
//! VoicePart 是文本规范化流水线的原子单元，Voice 决定片段路由到哪个合成 worker

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 片段来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    /// 普通文本
    Raw,
    /// 货币规范化产生的文本
    Currency,
    /// 反引号包裹的读音覆盖
    Override,
}

impl PartType {
    /// 数字/单词规范化只处理这两类
    pub fn is_normalizable(&self) -> bool {
        matches!(self, PartType::Raw | PartType::Currency)
    }
}

/// 片段之后插入的停顿长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseClass {
    /// 长句被折行后的短停顿
    #[default]
    Short,
    /// 逗号
    Medium,
    /// 句末
    Long,
}

/// 音色类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    /// 由合成 worker 朗读
    #[default]
    Reader,
    /// 预录音频片段（不派发合成任务）
    Clip,
}

/// 合成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    Precise,
    Fast,
}

/// 说话人参数
///
/// 模式由填写了哪个模型路径决定：fast_path 存在即为 fast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParameters {
    /// worker 侧的说话人名称
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub gpu: bool,
    #[serde(default)]
    pub warm_up: bool,
    #[serde(default)]
    pub period: bool,
    #[serde(default)]
    pub gate_threshold: f64,
    /// 起始偏移
    #[serde(default)]
    pub start: i32,
    #[serde(default = "default_pace")]
    pub pace: f64,
    #[serde(default)]
    pub pitch_shift: i32,
    /// 音素替换概率
    #[serde(default)]
    pub p_arpabet: f64,
    #[serde(default)]
    pub taco_path: Option<String>,
    #[serde(default)]
    pub fast_path: Option<String>,
    #[serde(default)]
    pub onnx_path: Option<String>,
    #[serde(default)]
    pub cmudict_path: Option<String>,
}

fn default_pace() -> f64 {
    1.0
}

impl Default for SynthesisParameters {
    fn default() -> Self {
        Self {
            speaker: String::new(),
            gpu: false,
            warm_up: false,
            period: false,
            gate_threshold: 0.0,
            start: 0,
            pace: default_pace(),
            pitch_shift: 0,
            p_arpabet: 0.0,
            taco_path: None,
            fast_path: None,
            onnx_path: None,
            cmudict_path: None,
        }
    }
}

impl SynthesisParameters {
    pub fn mode(&self) -> SynthesisMode {
        if self.fast_path.as_deref().is_some_and(|p| !p.is_empty()) {
            SynthesisMode::Fast
        } else {
            SynthesisMode::Precise
        }
    }
}

/// 音色
///
/// 相等性与哈希只看名称：路由按身份而不是参数值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    #[serde(default)]
    pub kind: VoiceKind,
    #[serde(flatten)]
    pub parameters: SynthesisParameters,
}

impl Voice {
    pub fn reader(name: impl Into<String>, parameters: SynthesisParameters) -> Self {
        Self {
            name: name.into(),
            kind: VoiceKind::Reader,
            parameters,
        }
    }

    pub fn clip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VoiceKind::Clip,
            parameters: SynthesisParameters::default(),
        }
    }

    pub fn is_reader(&self) -> bool {
        self.kind == VoiceKind::Reader
    }

    /// 用于指令匹配的小写名称
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl PartialEq for Voice {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Voice {}

impl Hash for Voice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// 规范化后的语音片段
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePart {
    pub value: String,
    pub voice: Arc<Voice>,
    pub part_type: PartType,
    /// 输出顺序，流水线结束时统一分配
    pub index: usize,
    /// 仅在分句之后有意义
    pub pause: PauseClass,
}

impl VoicePart {
    pub fn new(value: impl Into<String>, voice: Arc<Voice>, part_type: PartType) -> Self {
        Self {
            value: value.into(),
            voice,
            part_type,
            index: 0,
            pause: PauseClass::default(),
        }
    }

    /// 同音色、同类型，替换文本
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            voice: self.voice.clone(),
            part_type: self.part_type,
            index: self.index,
            pause: self.pause,
        }
    }

    pub fn with_type(mut self, part_type: PartType) -> Self {
        self.part_type = part_type;
        self
    }

    pub fn with_pause(mut self, pause: PauseClass) -> Self {
        self.pause = pause;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_identity_ignores_parameters() {
        let a = Voice::reader("alice", SynthesisParameters::default());
        let b = Voice::reader(
            "alice",
            SynthesisParameters {
                pace: 2.0,
                ..Default::default()
            },
        );
        assert_eq!(a, b);
        assert_ne!(a, Voice::reader("bob", SynthesisParameters::default()));
    }

    #[test]
    fn test_mode_follows_fast_path() {
        let mut params = SynthesisParameters {
            taco_path: Some("models/taco.pt".to_string()),
            ..Default::default()
        };
        assert_eq!(params.mode(), SynthesisMode::Precise);

        params.fast_path = Some("models/fast.pt".to_string());
        assert_eq!(params.mode(), SynthesisMode::Fast);
    }

    #[test]
    fn test_voice_deserializes_flat_parameters() {
        let voice: Voice = toml::from_str(
            r#"
            name = "narr1"
            speaker = "narrator"
            pace = 1.1
            fast_path = "fast.pt"
            "#,
        )
        .unwrap();
        assert_eq!(voice.kind, VoiceKind::Reader);
        assert_eq!(voice.parameters.speaker, "narrator");
        assert_eq!(voice.parameters.mode(), SynthesisMode::Fast);
    }
}
