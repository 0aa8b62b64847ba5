//! Pause Clip Loader - 停顿素材加载
//!
//! `pause_dir` 下的 short.wav / medium.wav / long.wav（可选 lead.wav）；
//! 未配置目录时按时长生成静音

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::ports::{AudioCodecPort, CodecError};
use crate::domain::{PauseClips, PcmClip, PcmFormat};

/// 停顿素材加载错误
#[derive(Debug, Error)]
pub enum PauseClipError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Codec { path: PathBuf, source: CodecError },
}

/// 静音停顿参数
#[derive(Debug, Clone, Copy)]
pub struct SilentPauses {
    pub format: PcmFormat,
    pub short_ms: u64,
    pub medium_ms: u64,
    pub long_ms: u64,
}

fn load_clip(
    codec: &dyn AudioCodecPort,
    dir: &Path,
    name: &str,
) -> Result<Option<PcmClip>, PauseClipError> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read(&path).map_err(|source| PauseClipError::Io {
        path: path.clone(),
        source,
    })?;
    codec
        .decode(&data)
        .map(Some)
        .map_err(|source| PauseClipError::Codec { path, source })
}

fn require_clip(
    codec: &dyn AudioCodecPort,
    dir: &Path,
    name: &str,
) -> Result<PcmClip, PauseClipError> {
    let path = dir.join(name);
    load_clip(codec, dir, name)?.ok_or_else(|| PauseClipError::Io {
        path,
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "pause clip missing"),
    })
}

/// 加载停顿素材，统一到 short.wav 的格式
pub fn load_pause_clips(
    dir: Option<&Path>,
    codec: &dyn AudioCodecPort,
    fallback: SilentPauses,
) -> Result<PauseClips, PauseClipError> {
    let Some(dir) = dir else {
        tracing::info!(
            sample_rate = fallback.format.sample_rate,
            short_ms = fallback.short_ms,
            medium_ms = fallback.medium_ms,
            long_ms = fallback.long_ms,
            "Using synthesised silence for pauses"
        );
        return Ok(PauseClips::silent(
            fallback.format,
            fallback.short_ms,
            fallback.medium_ms,
            fallback.long_ms,
        ));
    };

    let short = require_clip(codec, dir, "short.wav")?;
    let format = short.format();
    let medium = require_clip(codec, dir, "medium.wav")?.convert(format);
    let long = require_clip(codec, dir, "long.wav")?.convert(format);
    let lead = match load_clip(codec, dir, "lead.wav")? {
        Some(clip) => clip.convert(format),
        None => long.clone(),
    };

    tracing::info!(
        dir = %dir.display(),
        sample_rate = format.sample_rate,
        channels = format.channels,
        short_ms = short.duration_ms(),
        medium_ms = medium.duration_ms(),
        long_ms = long.duration_ms(),
        lead_ms = lead.duration_ms(),
        "Pause clips loaded"
    );

    Ok(PauseClips::new(short, medium, long, lead))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PauseClass;
    use crate::infrastructure::adapters::codec::WavCodec;

    fn fallback() -> SilentPauses {
        SilentPauses {
            format: PcmFormat::mono16(1000),
            short_ms: 10,
            medium_ms: 20,
            long_ms: 30,
        }
    }

    fn write(dir: &Path, name: &str, clip: &PcmClip) {
        std::fs::write(dir.join(name), WavCodec::new().encode(clip).unwrap()).unwrap();
    }

    #[test]
    fn test_silence_without_dir() {
        let clips = load_pause_clips(None, &WavCodec::new(), fallback()).unwrap();
        assert_eq!(clips.pause(PauseClass::Medium).frames(), 20);
        assert_eq!(clips.lead().frames(), 30);
    }

    #[test]
    fn test_load_from_dir_and_unify_format() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "short.wav", &PcmClip::silence(PcmFormat::mono16(1000), 10));
        write(dir.path(), "medium.wav", &PcmClip::silence(PcmFormat::mono16(2000), 20));
        write(dir.path(), "long.wav", &PcmClip::silence(PcmFormat::new(1000, 2, 16), 30));

        let clips = load_pause_clips(Some(dir.path()), &WavCodec::new(), fallback()).unwrap();
        assert_eq!(clips.format(), PcmFormat::mono16(1000));
        assert_eq!(clips.pause(PauseClass::Medium).frames(), 20);
        assert_eq!(clips.pause(PauseClass::Long).format(), PcmFormat::mono16(1000));
        assert_eq!(clips.lead().frames(), 30);
    }

    #[test]
    fn test_missing_clip_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "short.wav", &PcmClip::silence(PcmFormat::mono16(1000), 10));
        let err = load_pause_clips(Some(dir.path()), &WavCodec::new(), fallback()).unwrap_err();
        assert!(matches!(err, PauseClipError::Io { .. }));
    }
}
