//! 关联表
//!
//! correlation_id → 请求的响应通道。全进程共享一张表，每个请求通过
//! CorrelationScope 注册，scope 析构时移除该请求剩余的全部条目

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::error::SynthesisError;
use crate::application::ports::JobResponse;

/// 分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 已转发给等待中的请求
    Delivered,
    /// 未知或已完成/已放弃的 correlation_id
    Unknown,
    /// 请求已不再接收
    Dropped,
}

/// 共享关联表
#[derive(Debug, Default)]
pub struct CorrelationTable {
    entries: DashMap<String, mpsc::Sender<JobResponse>>,
    closed: AtomicBool,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 为一个请求开启注册作用域，`capacity` 为预期响应数
    pub fn scope(self: &Arc<Self>, capacity: usize) -> CorrelationScope {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        CorrelationScope {
            table: self.clone(),
            sender: Some(sender),
            receiver,
            ids: Vec::with_capacity(capacity),
        }
    }

    /// 转发响应并移除条目，从不阻塞
    pub fn dispatch(&self, response: JobResponse) -> DispatchOutcome {
        let Some((_, sender)) = self.entries.remove(&response.correlation_id) else {
            return DispatchOutcome::Unknown;
        };
        match sender.try_send(response) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(_) => DispatchOutcome::Dropped,
        }
    }

    /// 解复用任务退出时调用：清空表，等待中的请求随即收到 BusClosed
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.entries.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, correlation_id: &str) -> bool {
        self.entries.contains_key(correlation_id)
    }
}

/// 单个请求的注册作用域
pub struct CorrelationScope {
    table: Arc<CorrelationTable>,
    sender: Option<mpsc::Sender<JobResponse>>,
    receiver: mpsc::Receiver<JobResponse>,
    ids: Vec<String>,
}

impl CorrelationScope {
    /// 生成新的 correlation_id 并登记
    pub fn register(&mut self) -> Result<String, SynthesisError> {
        let sender = self.sender.as_ref().ok_or(SynthesisError::BusClosed)?;
        if self.table.is_closed() {
            return Err(SynthesisError::BusClosed);
        }

        let id = Uuid::new_v4().to_string();
        self.table.entries.insert(id.clone(), sender.clone());
        self.ids.push(id.clone());

        // close() 可能与插入并发
        if self.table.is_closed() {
            self.table.entries.remove(&id);
            return Err(SynthesisError::BusClosed);
        }
        Ok(id)
    }

    /// 停止注册；之后所有条目被消费或移除时通道关闭
    pub fn seal(&mut self) {
        self.sender = None;
    }

    /// 下一个响应；通道关闭（表被清空）时返回 None
    pub async fn recv(&mut self) -> Option<JobResponse> {
        self.receiver.recv().await
    }

    /// 仍在表中等待响应的条目数
    pub fn outstanding(&self) -> usize {
        self.ids.iter().filter(|id| self.table.contains(id)).count()
    }
}

impl Drop for CorrelationScope {
    fn drop(&mut self) {
        for id in &self.ids {
            self.table.entries.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ResponsePayload;

    fn response(id: &str) -> JobResponse {
        JobResponse {
            correlation_id: id.to_string(),
            worker_id: None,
            payload: ResponsePayload {
                data: String::new(),
                length: 0.0,
                speaker: String::new(),
            },
            content_length: 0,
            time: 0.0,
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_once() {
        let table = CorrelationTable::new().arc();
        let mut scope = table.scope(1);
        let id = scope.register().unwrap();
        scope.seal();

        assert_eq!(table.dispatch(response(&id)), DispatchOutcome::Delivered);
        assert_eq!(table.dispatch(response(&id)), DispatchOutcome::Unknown);
        assert!(table.is_empty());

        assert_eq!(scope.recv().await.unwrap().correlation_id, id);
        assert!(scope.recv().await.is_none());
    }

    #[test]
    fn test_drop_releases_entries() {
        let table = CorrelationTable::new().arc();
        {
            let mut scope = table.scope(3);
            for _ in 0..3 {
                scope.register().unwrap();
            }
            assert_eq!(table.len(), 3);
            assert_eq!(scope.outstanding(), 3);
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_scopes_are_independent() {
        let table = CorrelationTable::new().arc();
        let mut a = table.scope(1);
        let a_id = a.register().unwrap();
        {
            let mut b = table.scope(1);
            b.register().unwrap();
        }
        assert_eq!(table.len(), 1);
        assert!(table.contains(&a_id));
    }

    #[tokio::test]
    async fn test_close_wakes_waiters() {
        let table = CorrelationTable::new().arc();
        let mut scope = table.scope(2);
        scope.register().unwrap();
        scope.register().unwrap();
        scope.seal();

        table.close();
        assert!(scope.recv().await.is_none());
        assert!(matches!(scope.register(), Err(SynthesisError::BusClosed)));
    }

    #[test]
    fn test_register_after_close_fails() {
        let table = CorrelationTable::new().arc();
        table.close();
        let mut scope = table.scope(1);
        assert!(matches!(scope.register(), Err(SynthesisError::BusClosed)));
        assert!(table.is_empty());
    }
}
