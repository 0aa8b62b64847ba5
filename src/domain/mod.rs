//! Domain Layer - 领域层
//!
//! 纯数据类型与文本规范化流水线，不依赖任何 IO

pub mod audio;
pub mod lexicon;
pub mod parts;
pub mod pipeline;
pub mod roster;

pub use audio::{PauseClips, PcmClip, PcmFormat};
pub use lexicon::{Lexicon, LexiconError};
pub use parts::{
    PartType, PauseClass, SynthesisMode, SynthesisParameters, Voice, VoiceKind, VoicePart,
};
pub use pipeline::{PipelineOptions, TextPipeline, TextSource};
pub use roster::{RosterError, VoiceRoster};
