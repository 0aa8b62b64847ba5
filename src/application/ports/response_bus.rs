//! Response Bus Port - 合成结果订阅抽象
//!
//! 每个进程只订阅一次，由解复用任务按 correlationId 分发

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 订阅错误
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Response bus already has a subscriber")]
    AlreadySubscribed,

    #[error("Response bus closed")]
    Closed,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// 音频负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// base64 编码的 WAV
    pub data: String,
    /// 音频时长（秒，worker 上报）
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub speaker: String,
}

/// 合成结果（线上格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub correlation_id: String,
    #[serde(default)]
    pub worker_id: Option<String>,
    pub payload: ResponsePayload,
    #[serde(default)]
    pub content_length: u64,
    /// worker 处理耗时（秒）
    #[serde(default)]
    pub time: f64,
}

/// Response Bus Port
#[async_trait]
pub trait ResponseBusPort: Send + Sync {
    /// 订阅全部响应，第二次调用返回 AlreadySubscribed
    async fn subscribe(&self) -> Result<BoxStream<'static, JobResponse>, BusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_defaults() {
        let resp: JobResponse =
            serde_json::from_str(r#"{"correlationId":"c1","payload":{"data":"AAAA"}}"#).unwrap();
        assert_eq!(resp.correlation_id, "c1");
        assert_eq!(resp.worker_id, None);
        assert_eq!(resp.payload.data, "AAAA");
        assert_eq!(resp.content_length, 0);
    }
}
