//! Work Queue Port - 合成任务投递抽象
//!
//! 只追加：投递后由外部 worker 消费，结果经 Response Bus 返回

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{SynthesisMode, SynthesisParameters};

/// 投递错误
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Job rejected: {0}")]
    Rejected(String),

    #[error("Queue closed")]
    Closed,
}

/// 说话人参数（按模式只带对应的模型路径）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerProfile {
    pub speaker: String,
    pub gpu: bool,
    pub warm_up: bool,
    pub period: bool,
    pub gate_threshold: f64,
    pub start: i32,
    pub pace: f64,
    pub pitch_shift: i32,
    pub p_arpabet: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taco_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmudict_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onnx_path: Option<String>,
}

impl SpeakerProfile {
    pub fn from_parameters(params: &SynthesisParameters) -> Self {
        let mode = params.mode();
        Self {
            speaker: params.speaker.clone(),
            gpu: params.gpu,
            warm_up: params.warm_up,
            period: params.period,
            gate_threshold: params.gate_threshold,
            start: params.start,
            pace: params.pace,
            pitch_shift: params.pitch_shift,
            p_arpabet: params.p_arpabet,
            taco_path: match mode {
                SynthesisMode::Precise => params.taco_path.clone(),
                SynthesisMode::Fast => None,
            },
            fast_path: match mode {
                SynthesisMode::Fast => params.fast_path.clone(),
                SynthesisMode::Precise => None,
            },
            cmudict_path: match mode {
                SynthesisMode::Fast => params.cmudict_path.clone(),
                SynthesisMode::Precise => None,
            },
            onnx_path: params.onnx_path.clone(),
        }
    }
}

/// 合成任务描述（线上格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub correlation_id: String,
    pub response_topic: String,
    pub mode: SynthesisMode,
    #[serde(flatten)]
    pub profile: SpeakerProfile,
    pub text: String,
}

impl JobDescriptor {
    pub fn new(
        correlation_id: impl Into<String>,
        response_topic: impl Into<String>,
        params: &SynthesisParameters,
        text: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            response_topic: response_topic.into(),
            mode: params.mode(),
            profile: SpeakerProfile::from_parameters(params),
            text: text.into(),
        }
    }
}

/// Work Queue Port
#[async_trait]
pub trait WorkQueuePort: Send + Sync {
    /// 投递一个合成任务
    async fn enqueue(&self, job: JobDescriptor) -> Result<(), QueueError>;

    /// 响应地址，写入每个任务的 responseTopic
    fn response_topic(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precise_job_wire_format() {
        let params = SynthesisParameters {
            speaker: "narrator".to_string(),
            taco_path: Some("taco.pt".to_string()),
            cmudict_path: Some("dict.txt".to_string()),
            ..Default::default()
        };
        let job = JobDescriptor::new("c1", "topic", &params, "hello");
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(json["correlationId"], "c1");
        assert_eq!(json["responseTopic"], "topic");
        assert_eq!(json["mode"], "precise");
        assert_eq!(json["speaker"], "narrator");
        assert_eq!(json["pace"], 1.0);
        assert_eq!(json["tacoPath"], "taco.pt");
        assert!(json.get("fastPath").is_none());
        assert!(json.get("cmudictPath").is_none());
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn test_fast_job_wire_format() {
        let params = SynthesisParameters {
            taco_path: Some("taco.pt".to_string()),
            fast_path: Some("fast.pt".to_string()),
            cmudict_path: Some("dict.txt".to_string()),
            p_arpabet: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_value(JobDescriptor::new("c2", "t", &params, "x")).unwrap();

        assert_eq!(json["mode"], "fast");
        assert_eq!(json["fastPath"], "fast.pt");
        assert_eq!(json["cmudictPath"], "dict.txt");
        assert_eq!(json["pArpabet"], 0.5);
        assert!(json.get("tacoPath").is_none());
    }
}
