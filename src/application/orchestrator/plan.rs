//! 合成计划
//!
//! 按 (音色, 文本) 去重得到任务列表，并记录每个序号由哪个任务（或预录片段）填充

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{PauseClass, Voice, VoicePart};

/// 一个待派发的合成任务
#[derive(Debug, Clone)]
pub struct PlannedJob {
    pub voice: Arc<Voice>,
    pub text: String,
    /// 首次出现的序号
    pub first_index: usize,
}

/// 序号位置的来源
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// 由 jobs[i] 的音频填充
    Job(usize),
    /// 预录片段位置（不派发任务）
    Clip(Arc<Voice>),
}

#[derive(Debug, Clone)]
pub struct Position {
    pub slot: Slot,
    pub pause: PauseClass,
}

#[derive(Debug, Clone)]
pub struct SynthesisPlan {
    /// 按首次出现顺序排列
    pub jobs: Vec<PlannedJob>,
    /// 按序号排列
    pub positions: Vec<Position>,
}

impl SynthesisPlan {
    pub fn build(parts: &[VoicePart]) -> Self {
        let mut ordered: Vec<&VoicePart> = parts.iter().collect();
        ordered.sort_by_key(|p| p.index);

        let mut jobs: Vec<PlannedJob> = Vec::new();
        let mut dedup: HashMap<(&str, &str), usize> = HashMap::new();
        let mut positions = Vec::with_capacity(ordered.len());

        for part in ordered {
            let slot = if part.voice.is_reader() {
                let key = (part.voice.name.as_str(), part.value.as_str());
                let job = *dedup.entry(key).or_insert_with(|| {
                    jobs.push(PlannedJob {
                        voice: part.voice.clone(),
                        text: part.value.clone(),
                        first_index: part.index,
                    });
                    jobs.len() - 1
                });
                Slot::Job(job)
            } else {
                Slot::Clip(part.voice.clone())
            };
            positions.push(Position {
                slot,
                pause: part.pause,
            });
        }

        Self { jobs, positions }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}
