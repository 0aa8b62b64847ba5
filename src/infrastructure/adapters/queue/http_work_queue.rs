//! HTTP Work Queue - 通过 HTTP 投递合成任务
//!
//! POST {base_url}/api/jobs
//! Request: JobDescriptor (JSON, camelCase)
//! Response: 2xx 表示已入队，结果经 Response Bus 异步返回

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{JobDescriptor, QueueError, WorkQueuePort};

/// HTTP 任务队列配置
#[derive(Debug, Clone)]
pub struct HttpWorkQueueConfig {
    /// 队列服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 写入任务的响应地址
    pub response_topic: String,
}

impl Default for HttpWorkQueueConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8100".to_string(),
            timeout_secs: 10,
            response_topic: "tts:responses".to_string(),
        }
    }
}

impl HttpWorkQueueConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_response_topic(mut self, topic: impl Into<String>) -> Self {
        self.response_topic = topic.into();
        self
    }
}

/// HTTP 任务队列
pub struct HttpWorkQueue {
    client: Client,
    config: HttpWorkQueueConfig,
}

impl HttpWorkQueue {
    pub fn new(config: HttpWorkQueueConfig) -> Result<Self, QueueError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QueueError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn jobs_url(&self) -> String {
        format!("{}/api/jobs", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WorkQueuePort for HttpWorkQueue {
    async fn enqueue(&self, job: JobDescriptor) -> Result<(), QueueError> {
        tracing::debug!(
            url = %self.jobs_url(),
            correlation_id = %job.correlation_id,
            mode = ?job.mode,
            text_len = job.text.len(),
            "Enqueueing synthesis job"
        );

        let response = self
            .client
            .post(self.jobs_url())
            .json(&job)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueueError::Timeout
                } else if e.is_connect() {
                    QueueError::NetworkError(format!("Cannot connect to work queue: {}", e))
                } else {
                    QueueError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(QueueError::Rejected(format!("HTTP {}: {}", status, error_text)));
        }
        Ok(())
    }

    fn response_topic(&self) -> String {
        self.config.response_topic.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpWorkQueueConfig::default();
        assert_eq!(config.base_url, "http://localhost:8100");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.response_topic, "tts:responses");
    }

    #[test]
    fn test_config_builder() {
        let config = HttpWorkQueueConfig::new("http://queue:9000/")
            .with_timeout(3)
            .with_response_topic("replies");
        let queue = HttpWorkQueue::new(config).unwrap();
        assert_eq!(queue.jobs_url(), "http://queue:9000/api/jobs");
        assert_eq!(queue.response_topic(), "replies");
    }

    #[tokio::test]
    async fn test_unreachable_queue() {
        // 端口 9 (discard) 通常无人监听
        let queue = HttpWorkQueue::new(HttpWorkQueueConfig::new("http://127.0.0.1:9").with_timeout(2)).unwrap();
        let job = JobDescriptor::new("c1", "t", &Default::default(), "hi");
        assert!(matches!(
            queue.enqueue(job).await,
            Err(QueueError::NetworkError(_)) | Err(QueueError::Timeout)
        ));
    }
}
