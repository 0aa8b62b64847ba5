//! Codec Adapter - WAV 编解码与停顿素材

mod pause_clips;
mod wav_codec;

pub use pause_clips::{load_pause_clips, PauseClipError, SilentPauses};
pub use wav_codec::WavCodec;
