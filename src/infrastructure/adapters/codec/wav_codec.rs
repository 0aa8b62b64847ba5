//! WAV Codec - RIFF/WAVE PCM 编解码
//!
//! 基于 hound，支持 8/16/24/32 位整数 PCM（含 WAVE_FORMAT_EXTENSIBLE）

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::application::ports::{AudioCodecPort, CodecError};
use crate::domain::{PcmClip, PcmFormat};

/// WAV 编解码器
#[derive(Debug, Clone, Default)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }

    fn validate(spec: &WavSpec) -> Result<PcmFormat, CodecError> {
        if spec.sample_format != SampleFormat::Int {
            return Err(CodecError::UnsupportedFormat(
                "floating-point samples".to_string(),
            ));
        }
        if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(CodecError::UnsupportedFormat(format!(
                "{} bits per sample",
                spec.bits_per_sample
            )));
        }
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(CodecError::InvalidInput(
                "Invalid WAV: zero channels or sample rate".to_string(),
            ));
        }
        Ok(PcmFormat::new(
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
        ))
    }

    /// 满量程：2^(bits-1)
    fn full_scale(bits: u16) -> f64 {
        (1i64 << (bits - 1)) as f64
    }
}

fn read_error(e: hound::Error) -> CodecError {
    match e {
        hound::Error::Unsupported | hound::Error::InvalidSampleFormat => {
            CodecError::UnsupportedFormat(e.to_string())
        }
        other => CodecError::InvalidInput(format!("Invalid WAV: {}", other)),
    }
}

fn write_error(e: hound::Error) -> CodecError {
    CodecError::EncodingError(e.to_string())
}

impl AudioCodecPort for WavCodec {
    fn decode(&self, data: &[u8]) -> Result<PcmClip, CodecError> {
        let mut reader = WavReader::new(Cursor::new(data)).map_err(read_error)?;
        let format = Self::validate(&reader.spec())?;
        let scale = Self::full_scale(format.bits_per_sample);

        // 流式写出的 WAV 常把 data 长度写成占位值，按实际字节读到 EOF 为止
        let declared = reader.len() as usize;
        let mut samples = Vec::with_capacity(declared.min(data.len()));
        for sample in reader.samples::<i32>() {
            match sample {
                Ok(v) => samples.push((v as f64 / scale) as f32),
                Err(hound::Error::IoError(_)) => break,
                Err(e) => return Err(read_error(e)),
            }
        }

        let channels = format.channels as usize;
        let whole = samples.len() - samples.len() % channels;
        if whole < declared {
            tracing::debug!(
                declared,
                read = whole,
                "WAV data chunk shorter than declared, truncating"
            );
        }
        samples.truncate(whole);

        Ok(PcmClip::new(format, samples))
    }

    fn encode(&self, clip: &PcmClip) -> Result<Vec<u8>, CodecError> {
        let format = clip.format();
        if !matches!(format.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(CodecError::UnsupportedFormat(format!(
                "{} bits per sample",
                format.bits_per_sample
            )));
        }

        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.bits_per_sample,
            sample_format: SampleFormat::Int,
        };
        let scale = Self::full_scale(format.bits_per_sample);

        let mut cursor = Cursor::new(Vec::with_capacity(
            68 + clip.samples().len() * format.bytes_per_sample(),
        ));
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(write_error)?;
        for &s in clip.samples() {
            let v = (s.clamp(-1.0, 1.0) as f64 * scale)
                .round()
                .clamp(-scale, scale - 1.0) as i32;
            writer.write_sample(v).map_err(write_error)?;
        }
        writer.finalize().map_err(write_error)?;

        Ok(cursor.into_inner())
    }

    fn content_type(&self) -> &'static str {
        "audio/wav"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// data chunk 之前的字节数
    fn header_len(wav: &[u8], format: PcmFormat, samples: usize) -> usize {
        wav.len() - samples * format.bytes_per_sample()
    }

    #[test]
    fn test_header_layout() {
        let format = PcmFormat::new(22050, 2, 16);
        let clip = PcmClip::new(format, vec![0.0; 8]);
        let wav = WavCodec::new().encode(&clip).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let spec = WavReader::new(Cursor::new(&wav[..])).unwrap().spec();
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.bits_per_sample, 16);
    }

    #[test]
    fn test_16bit_samples_survive_exactly() {
        let codec = WavCodec::new();
        let samples = vec![0.0, 0.5, -0.5, -1.0, 0.25];
        let clip = PcmClip::new(PcmFormat::mono16(8000), samples.clone());
        let decoded = codec.decode(&codec.encode(&clip).unwrap()).unwrap();
        assert_eq!(decoded.samples(), samples.as_slice());
        assert_eq!(decoded.format(), PcmFormat::mono16(8000));
    }

    #[test]
    fn test_24bit_sign_extension() {
        let codec = WavCodec::new();
        let clip = PcmClip::new(PcmFormat::new(8000, 1, 24), vec![-0.5, 0.5]);
        let decoded = codec.decode(&codec.encode(&clip).unwrap()).unwrap();
        assert_eq!(decoded.samples(), &[-0.5, 0.5]);
        assert_eq!(decoded.format().bits_per_sample, 24);
    }

    #[test]
    fn test_8bit_is_unsigned() {
        let codec = WavCodec::new();
        let clip = PcmClip::new(PcmFormat::new(8000, 1, 8), vec![0.0; 40]);
        let wav = codec.encode(&clip).unwrap();
        assert!(wav[wav.len() - 40..].iter().all(|&b| b == 128));
        assert!(codec.decode(&wav).unwrap().samples().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_skips_unknown_chunks() {
        let codec = WavCodec::new();
        let format = PcmFormat::mono16(8000);
        let plain = codec.encode(&PcmClip::new(format, vec![0.5; 20])).unwrap();
        let data_chunk = header_len(&plain, format, 20) - 8;

        // 在 fmt 与 data 之间插入一个 LIST chunk
        let mut wav = plain[..data_chunk].to_vec();
        wav.extend_from_slice(b"LIST");
        wav.extend_from_slice(&4u32.to_le_bytes());
        wav.extend_from_slice(&[1, 2, 3, 4]);
        wav.extend_from_slice(&plain[data_chunk..]);

        let decoded = codec.decode(&wav).unwrap();
        assert_eq!(decoded.frames(), 20);
        assert!(decoded.samples().iter().all(|s| *s == 0.5));
    }

    #[test]
    fn test_truncated_data_chunk() {
        let codec = WavCodec::new();
        let format = PcmFormat::mono16(8000);
        let mut wav = codec.encode(&PcmClip::new(format, vec![0.5; 20])).unwrap();
        let header = header_len(&wav, format, 20);
        wav.truncate(header + 11);
        assert_eq!(codec.decode(&wav).unwrap().frames(), 5);
    }

    #[test]
    fn test_truncated_stereo_drops_partial_frame() {
        let codec = WavCodec::new();
        let format = PcmFormat::new(8000, 2, 16);
        let mut wav = codec.encode(&PcmClip::new(format, vec![0.25; 20])).unwrap();
        let header = header_len(&wav, format, 20);
        // 3 个完整帧 + 1 个左声道样本
        wav.truncate(header + 14);

        let decoded = codec.decode(&wav).unwrap();
        assert_eq!(decoded.frames(), 3);
        assert_eq!(decoded.samples().len(), 6);
    }

    #[test]
    fn test_rejects_garbage() {
        let codec = WavCodec::new();
        assert!(matches!(
            codec.decode(b"definitely not a wav file, just some bytes here"),
            Err(CodecError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_float() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(
            WavCodec::new().decode(&cursor.into_inner()),
            Err(CodecError::UnsupportedFormat(_))
        ));
    }
}
