//! Channel Response Bus - 进程内响应总线
//!
//! 只允许一个订阅者；外部 worker 的回调（HTTP）与进程内 worker 都从这里发布

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{BusError, JobResponse, ResponseBusPort};

/// 进程内响应总线
pub struct ChannelResponseBus {
    sender: mpsc::Sender<JobResponse>,
    receiver: Mutex<Option<mpsc::Receiver<JobResponse>>>,
    shutdown: CancellationToken,
}

impl ChannelResponseBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            shutdown: CancellationToken::new(),
        }
    }

    /// 发布一条响应
    pub async fn publish(&self, response: JobResponse) -> Result<(), BusError> {
        if self.shutdown.is_cancelled() {
            return Err(BusError::Closed);
        }
        self.sender
            .send(response)
            .await
            .map_err(|_| BusError::Closed)
    }

    /// 发布原始 JSON 消息，格式错误的消息被丢弃
    pub async fn publish_json(&self, raw: &[u8]) -> Result<(), BusError> {
        let response: JobResponse = serde_json::from_slice(raw).map_err(|e| {
            tracing::warn!(error = %e, bytes = raw.len(), "Skipping malformed response message");
            BusError::Malformed(e.to_string())
        })?;
        self.publish(response).await
    }

    /// 结束订阅流
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl ResponseBusPort for ChannelResponseBus {
    async fn subscribe(&self) -> Result<BoxStream<'static, JobResponse>, BusError> {
        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or(BusError::AlreadySubscribed)?;

        let responses = stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|response| (response, receiver))
        });
        Ok(responses
            .take_until(self.shutdown.clone().cancelled_owned())
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = r#"{"correlationId":"c1","workerId":"w","payload":{"data":"AA==","length":0.5,"speaker":"s"},"contentLength":2,"time":0.1}"#;

    #[tokio::test]
    async fn test_single_subscription() {
        let bus = ChannelResponseBus::new(4);
        assert!(bus.subscribe().await.is_ok());
        assert!(matches!(
            bus.subscribe().await,
            Err(BusError::AlreadySubscribed)
        ));
    }

    #[tokio::test]
    async fn test_publish_json() {
        let bus = ChannelResponseBus::new(4);
        let mut stream = bus.subscribe().await.unwrap();

        bus.publish_json(MESSAGE.as_bytes()).await.unwrap();
        assert!(matches!(
            bus.publish_json(b"{not json").await,
            Err(BusError::Malformed(_))
        ));

        let response = stream.next().await.unwrap();
        assert_eq!(response.correlation_id, "c1");
        assert_eq!(response.worker_id.as_deref(), Some("w"));
        assert_eq!(response.payload.length, 0.5);
    }

    #[tokio::test]
    async fn test_close_ends_stream() {
        let bus = ChannelResponseBus::new(4);
        let mut stream = bus.subscribe().await.unwrap();
        bus.close();
        assert!(stream.next().await.is_none());
        assert!(matches!(
            bus.publish_json(MESSAGE.as_bytes()).await,
            Err(BusError::Closed)
        ));
    }
}
