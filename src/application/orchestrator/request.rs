//! 请求生命周期
//!
//! Collecting → Assembling → Complete | Failed，终态不再变化。
//! 进行中的请求登记在 RequestRegistry，RequestGuard 析构时移除

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// 请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// 已派发任务，等待响应
    Collecting,
    /// 响应收齐，正在解码拼接
    Assembling,
    Complete,
    Failed,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Complete | RequestState::Failed)
    }
}

/// 进行中请求的快照
#[derive(Debug, Clone, Serialize)]
pub struct RequestInfo {
    pub request_id: Uuid,
    pub state: RequestState,
    pub jobs: usize,
    pub received: usize,
    pub created_at: DateTime<Utc>,
}

/// 进行中请求登记表
#[derive(Debug, Default)]
pub struct RequestRegistry {
    requests: DashMap<Uuid, RequestInfo>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 登记新请求，初始状态 Collecting
    pub fn track(self: &Arc<Self>, jobs: usize) -> RequestGuard {
        let request_id = Uuid::new_v4();
        self.requests.insert(
            request_id,
            RequestInfo {
                request_id,
                state: RequestState::Collecting,
                jobs,
                received: 0,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(request_id = %request_id, jobs, state = ?RequestState::Collecting, "Request tracked");
        RequestGuard {
            registry: self.clone(),
            request_id,
        }
    }

    pub fn get(&self, request_id: &Uuid) -> Option<RequestInfo> {
        self.requests.get(request_id).map(|r| r.clone())
    }

    /// 按创建时间排序
    pub fn list(&self) -> Vec<RequestInfo> {
        let mut list: Vec<RequestInfo> = self.requests.iter().map(|r| r.clone()).collect();
        list.sort_by_key(|r| r.created_at);
        list
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// 单个请求在登记表中的句柄
pub struct RequestGuard {
    registry: Arc<RequestRegistry>,
    request_id: Uuid,
}

impl RequestGuard {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn state(&self) -> Option<RequestState> {
        self.registry.requests.get(&self.request_id).map(|r| r.state)
    }

    pub fn received(&self) -> usize {
        self.registry
            .requests
            .get(&self.request_id)
            .map(|r| r.received)
            .unwrap_or_default()
    }

    pub fn record_response(&self) {
        if let Some(mut info) = self.registry.requests.get_mut(&self.request_id) {
            info.received += 1;
        }
    }

    /// 终态之后的迁移被忽略
    pub fn transition(&self, state: RequestState) {
        if let Some(mut info) = self.registry.requests.get_mut(&self.request_id) {
            if info.state.is_terminal() {
                return;
            }
            let old_state = info.state;
            info.state = state;
            tracing::debug!(
                request_id = %self.request_id,
                old_state = ?old_state,
                new_state = ?state,
                "Request state changed"
            );
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.registry.requests.remove(&self.request_id);
    }
}
