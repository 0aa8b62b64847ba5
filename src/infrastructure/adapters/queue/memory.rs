//! In-Memory Work Queue - 进程内任务队列
//!
//! 任务写入 mpsc 通道，由 FakeSynthWorker 或测试直接消费

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::ports::{JobDescriptor, QueueError, WorkQueuePort};

/// 进程内任务队列
pub struct InMemoryWorkQueue {
    sender: mpsc::Sender<JobDescriptor>,
    response_topic: String,
}

impl InMemoryWorkQueue {
    /// 返回队列和消费端
    pub fn new(
        capacity: usize,
        response_topic: impl Into<String>,
    ) -> (Self, mpsc::Receiver<JobDescriptor>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                response_topic: response_topic.into(),
            },
            receiver,
        )
    }
}

#[async_trait]
impl WorkQueuePort for InMemoryWorkQueue {
    async fn enqueue(&self, job: JobDescriptor) -> Result<(), QueueError> {
        self.sender.send(job).await.map_err(|_| QueueError::Closed)
    }

    fn response_topic(&self) -> String {
        self.response_topic.clone()
    }
}
