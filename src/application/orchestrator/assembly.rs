//! 按序号拼接音频
//!
//! 首尾各 `padding` 段静音；每个序号先放音频再放对应停顿。
//! 预录片段位置目前不产生音频，只保留其停顿

use crate::domain::{PauseClips, PcmClip, PcmFormat};

use super::plan::{SynthesisPlan, Slot};

/// `decoded[i]` 对应 `plan.jobs[i]`，且已转换为 `format`；`pauses` 同样已转换
pub fn assemble(
    plan: &SynthesisPlan,
    decoded: &[PcmClip],
    pauses: &PauseClips,
    padding: usize,
    format: PcmFormat,
) -> PcmClip {
    let mut out = PcmClip::empty(format);

    for _ in 0..padding {
        out.append(pauses.lead());
    }

    for position in &plan.positions {
        if let Slot::Job(job) = &position.slot {
            if let Some(clip) = decoded.get(*job) {
                out.append(clip);
            }
        }
        out.append(pauses.pause(position.pause));
    }

    for _ in 0..padding {
        out.append(pauses.lead());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PartType, PauseClass, SynthesisParameters, Voice, VoicePart};
    use std::sync::Arc;

    fn format() -> PcmFormat {
        PcmFormat::mono16(1000)
    }

    fn tone(value: f32, frames: usize) -> PcmClip {
        PcmClip::new(format(), vec![value; frames])
    }

    #[test]
    fn test_assembly_order_and_pauses() {
        let alice = Arc::new(Voice::reader("alice", SynthesisParameters::default()));
        let horn = Arc::new(Voice::clip("horn"));
        let mut parts = vec![
            VoicePart::new("a", alice.clone(), PartType::Raw).with_pause(PauseClass::Medium),
            VoicePart::new("", horn, PartType::Raw).with_pause(PauseClass::Short),
            VoicePart::new("a", alice, PartType::Raw).with_pause(PauseClass::Long),
        ];
        for (i, p) in parts.iter_mut().enumerate() {
            p.index = i;
        }
        let plan = SynthesisPlan::build(&parts);
        let pauses = PauseClips::silent(format(), 1, 2, 3);

        let out = assemble(&plan, &[tone(0.5, 4)], &pauses, 2, format());

        // lead 2×3, a(4)+medium(2), clip(0)+short(1), a(4)+long(3), lead 2×3
        assert_eq!(out.frames(), 6 + 6 + 1 + 7 + 6);
        let samples = out.samples();
        assert!(samples[..6].iter().all(|s| *s == 0.0));
        assert!(samples[6..10].iter().all(|s| *s == 0.5));
        assert!(samples[10..13].iter().all(|s| *s == 0.0));
        assert!(samples[13..17].iter().all(|s| *s == 0.5));
    }

    #[test]
    fn test_no_positions_is_padding_only() {
        let plan = SynthesisPlan::build(&[]);
        let pauses = PauseClips::silent(format(), 1, 2, 3);
        let out = assemble(&plan, &[], &pauses, 5, format());
        assert_eq!(out.frames(), 30);
    }
}
