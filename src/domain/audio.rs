//! PCM 音频模型
//!
//! PcmClip 保存交错排列、归一化到 [-1, 1] 的样本；位深只在编码时生效

use super::parts::PauseClass;

/// 音频格式（采样率、声道数、位深）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// 单声道 16 位
    pub fn mono16(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1, 16)
    }

    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample as usize).div_ceil(8)
    }

    pub fn block_align(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }
}

/// 一段 PCM 音频
#[derive(Debug, Clone, PartialEq)]
pub struct PcmClip {
    format: PcmFormat,
    samples: Vec<f32>,
}

impl PcmClip {
    pub fn new(format: PcmFormat, samples: Vec<f32>) -> Self {
        Self { format, samples }
    }

    pub fn empty(format: PcmFormat) -> Self {
        Self::new(format, Vec::new())
    }

    /// 指定时长的静音
    pub fn silence(format: PcmFormat, duration_ms: u64) -> Self {
        let frames = (format.sample_rate as u64 * duration_ms / 1000) as usize;
        Self::new(format, vec![0.0; frames * format.channels as usize])
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        match self.format.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self.format.sample_rate {
            0 => 0,
            rate => self.frames() as u64 * 1000 / rate as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 追加同格式音频，格式不一致时先转换
    pub fn append(&mut self, other: &PcmClip) {
        if other.format == self.format {
            self.samples.extend_from_slice(&other.samples);
        } else {
            let converted = other.convert(self.format);
            self.samples.extend_from_slice(&converted.samples);
        }
    }

    /// 转换到目标格式：声道 → 采样率 → 位深
    pub fn convert(&self, target: PcmFormat) -> PcmClip {
        if self.format == target {
            return self.clone();
        }
        let remixed = remix(&self.samples, self.format.channels, target.channels);
        let resampled = resample(
            &remixed,
            self.format.sample_rate,
            target.sample_rate,
            target.channels,
        );
        PcmClip::new(target, resampled)
    }
}

/// 声道转换：多声道转单声道取平均，其余按声道号取模映射
fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }
    let from = from as usize;
    let to = to as usize;

    samples
        .chunks(from)
        .flat_map(|frame| {
            (0..to).map(move |ch| {
                if to == 1 {
                    frame.iter().sum::<f32>() / frame.len() as f32
                } else {
                    frame[ch % frame.len()]
                }
            })
        })
        .collect()
}

/// 简单线性重采样
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32, channels: u16) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 || channels == 0 {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let channel_count = channels as usize;
    let frame_count = samples.len() / channel_count;
    if frame_count == 0 {
        return Vec::new();
    }
    let new_frame_count = (frame_count as f64 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_frame_count * channel_count);

    for i in 0..new_frame_count {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        for ch in 0..channel_count {
            let idx0 = src_idx * channel_count + ch;
            let idx1 = ((src_idx + 1).min(frame_count - 1)) * channel_count + ch;

            let s0 = samples.get(idx0).copied().unwrap_or(0.0);
            let s1 = samples.get(idx1).copied().unwrap_or(s0);

            // 线性插值
            resampled.push(s0 + (s1 - s0) * frac as f32);
        }
    }

    resampled
}

/// 停顿与首尾静音素材，启动时加载一次
#[derive(Debug, Clone)]
pub struct PauseClips {
    short: PcmClip,
    medium: PcmClip,
    long: PcmClip,
    lead: PcmClip,
}

impl PauseClips {
    pub fn new(short: PcmClip, medium: PcmClip, long: PcmClip, lead: PcmClip) -> Self {
        Self {
            short,
            medium,
            long,
            lead,
        }
    }

    /// 生成静音停顿，首尾静音与长停顿相同
    pub fn silent(format: PcmFormat, short_ms: u64, medium_ms: u64, long_ms: u64) -> Self {
        let long = PcmClip::silence(format, long_ms);
        Self::new(
            PcmClip::silence(format, short_ms),
            PcmClip::silence(format, medium_ms),
            long.clone(),
            long,
        )
    }

    pub fn pause(&self, class: PauseClass) -> &PcmClip {
        match class {
            PauseClass::Short => &self.short,
            PauseClass::Medium => &self.medium,
            PauseClass::Long => &self.long,
        }
    }

    pub fn lead(&self) -> &PcmClip {
        &self.lead
    }

    /// 没有任何合成结果时使用的格式
    pub fn format(&self) -> PcmFormat {
        self.long.format()
    }

    pub fn convert(&self, target: PcmFormat) -> PauseClips {
        Self::new(
            self.short.convert(target),
            self.medium.convert(target),
            self.long.convert(target),
            self.lead.convert(target),
        )
    }
}
