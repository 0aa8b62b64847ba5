//! Job Orchestrator - 合成任务编排
//!
//! 去重 → 派发 → 按 correlation_id 收集 → 解码 → 按序号拼接。
//! 每个请求有独立的截止时间并响应调用方取消；任何退出路径都会释放其关联表条目

mod assembly;
mod correlation;
mod demux;
mod plan;
mod request;

pub use assembly::assemble;
pub use correlation::{CorrelationScope, CorrelationTable, DispatchOutcome};
pub use demux::{run_demultiplexer, spawn_demultiplexer};
pub use plan::{PlannedJob, Position, Slot, SynthesisPlan};
pub use request::{RequestGuard, RequestInfo, RequestRegistry, RequestState};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::error::SynthesisError;
use super::ports::{AudioCodecPort, JobDescriptor, JobResponse, WorkQueuePort};
use crate::domain::{PauseClips, PcmClip, PcmFormat, VoicePart};

/// 编排器配置
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 单个请求的截止时间（派发 + 收集）
    pub request_timeout: Duration,
    /// 首尾静音段数
    pub padding_clips: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            padding_clips: 5,
        }
    }
}

enum Wait<T> {
    Done(T),
    TimedOut,
    Cancelled,
}

/// 合成编排器
pub struct Orchestrator {
    queue: Arc<dyn WorkQueuePort>,
    codec: Arc<dyn AudioCodecPort>,
    table: Arc<CorrelationTable>,
    registry: Arc<RequestRegistry>,
    pauses: Arc<PauseClips>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        queue: Arc<dyn WorkQueuePort>,
        codec: Arc<dyn AudioCodecPort>,
        table: Arc<CorrelationTable>,
        pauses: Arc<PauseClips>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            queue,
            codec,
            table,
            registry: RequestRegistry::new().arc(),
            pauses,
            config,
        }
    }

    pub fn table(&self) -> &Arc<CorrelationTable> {
        &self.table
    }

    pub fn registry(&self) -> &Arc<RequestRegistry> {
        &self.registry
    }

    /// 合成一个已规范化的片段序列
    pub async fn synthesize(
        &self,
        parts: &[VoicePart],
        cancel: &CancellationToken,
    ) -> Result<PcmClip, SynthesisError> {
        let plan = SynthesisPlan::build(parts);
        let guard = self.registry.track(plan.job_count());
        let started = Instant::now();

        let result = self.run(&plan, &guard, cancel).await;
        match &result {
            Ok(clip) => {
                guard.transition(RequestState::Complete);
                tracing::info!(
                    request_id = %guard.request_id(),
                    jobs = plan.job_count(),
                    positions = plan.positions.len(),
                    duration_ms = clip.duration_ms(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Request complete"
                );
            }
            Err(e) => {
                guard.transition(RequestState::Failed);
                tracing::warn!(
                    request_id = %guard.request_id(),
                    error = %e,
                    "Request failed"
                );
            }
        }
        result
    }

    async fn run(
        &self,
        plan: &SynthesisPlan,
        guard: &RequestGuard,
        cancel: &CancellationToken,
    ) -> Result<PcmClip, SynthesisError> {
        let timeout = self.config.request_timeout;
        let mut scope = self.table.scope(plan.job_count());

        let wait = tokio::select! {
            biased;
            _ = cancel.cancelled() => Wait::Cancelled,
            res = tokio::time::timeout(timeout, self.collect(plan, &mut scope, guard)) => match res {
                Ok(collected) => Wait::Done(collected),
                Err(_) => Wait::TimedOut,
            },
        };

        let responses = match wait {
            Wait::Done(collected) => collected?,
            Wait::Cancelled => return Err(SynthesisError::Cancelled),
            Wait::TimedOut => {
                return Err(SynthesisError::Timeout {
                    waited: timeout,
                    outstanding: plan.job_count().saturating_sub(guard.received()),
                })
            }
        };
        drop(scope);

        guard.transition(RequestState::Assembling);
        self.decode_and_assemble(plan, &responses)
    }

    /// 派发全部任务并等待每个任务恰好一个响应，结果按 `plan.jobs` 顺序返回
    async fn collect(
        &self,
        plan: &SynthesisPlan,
        scope: &mut CorrelationScope,
        guard: &RequestGuard,
    ) -> Result<Vec<JobResponse>, SynthesisError> {
        let request_id = guard.request_id();
        let topic = self.queue.response_topic();
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(plan.job_count());

        for (i, job) in plan.jobs.iter().enumerate() {
            let correlation_id = scope.register()?;
            slots.insert(correlation_id.clone(), i);

            let descriptor = JobDescriptor::new(
                correlation_id.clone(),
                topic.clone(),
                &job.voice.parameters,
                job.text.clone(),
            );
            if let Err(e) = self.queue.enqueue(descriptor).await {
                tracing::error!(
                    request_id = %request_id,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Failed to enqueue job"
                );
                return Err(e.into());
            }
            tracing::debug!(
                request_id = %request_id,
                correlation_id = %correlation_id,
                voice = %job.voice.name,
                "Job dispatched"
            );
        }
        scope.seal();

        if plan.job_count() > 0 {
            tracing::info!(request_id = %request_id, jobs = plan.job_count(), "Jobs dispatched");
        }

        let mut responses: Vec<Option<JobResponse>> = vec![None; plan.job_count()];
        let mut remaining = plan.job_count();
        while remaining > 0 {
            let response = scope.recv().await.ok_or(SynthesisError::BusClosed)?;
            let Some(&i) = slots.get(&response.correlation_id) else {
                continue;
            };
            if responses[i].is_none() {
                remaining -= 1;
                guard.record_response();
            }
            responses[i] = Some(response);
        }

        Ok(responses.into_iter().flatten().collect())
    }

    /// 按计划顺序解码，第一个解码成功的负载决定整体格式
    fn decode_and_assemble(
        &self,
        plan: &SynthesisPlan,
        responses: &[JobResponse],
    ) -> Result<PcmClip, SynthesisError> {
        let mut format: Option<PcmFormat> = None;
        let mut decoded = Vec::with_capacity(responses.len());

        for response in responses {
            let bytes = BASE64
                .decode(response.payload.data.as_bytes())
                .map_err(|e| SynthesisError::decode(&response.correlation_id, e.to_string()))?;
            let clip = self
                .codec
                .decode(&bytes)
                .map_err(|e| SynthesisError::decode(&response.correlation_id, e.to_string()))?;

            let target = *format.get_or_insert(clip.format());
            decoded.push(clip.convert(target));
        }

        let format = format.unwrap_or_else(|| self.pauses.format());
        let pauses = self.pauses.convert(format);
        Ok(assemble(
            plan,
            &decoded,
            &pauses,
            self.config.padding_clips,
            format,
        ))
    }
}
