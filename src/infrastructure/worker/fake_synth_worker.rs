//! Fake Synth Worker - 进程内合成 worker
//!
//! 消费 InMemoryWorkQueue 的任务，按文本长度生成静音 WAV 并发布到响应总线。
//! 用于本地开发和测试，不实际调用 TTS 模型

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::application::ports::{
    AudioCodecPort, CodecError, JobDescriptor, JobResponse, ResponsePayload,
};
use crate::domain::{PcmClip, PcmFormat};
use crate::infrastructure::adapters::queue::ChannelResponseBus;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct FakeSynthWorkerConfig {
    /// 最大并发任务数
    pub max_concurrent: usize,
    /// 输出采样率
    pub sample_rate: u32,
    /// 每个字符的音频时长（毫秒）
    pub ms_per_char: u64,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeSynthWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            sample_rate: 22050,
            ms_per_char: 60,
            latency_ms: 200,
        }
    }
}

/// 进程内合成 worker
pub struct FakeSynthWorker {
    config: FakeSynthWorkerConfig,
    jobs: mpsc::Receiver<JobDescriptor>,
    bus: Arc<ChannelResponseBus>,
    codec: Arc<dyn AudioCodecPort>,
    worker_id: String,
}

impl FakeSynthWorker {
    pub fn new(
        jobs: mpsc::Receiver<JobDescriptor>,
        bus: Arc<ChannelResponseBus>,
        codec: Arc<dyn AudioCodecPort>,
        config: FakeSynthWorkerConfig,
    ) -> Self {
        Self {
            config,
            jobs,
            bus,
            codec,
            worker_id: format!("fake-{}", uuid::Uuid::new_v4()),
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 启动 Worker，队列关闭时退出
    pub async fn run(mut self) {
        tracing::info!(
            worker_id = %self.worker_id,
            max_concurrent = self.config.max_concurrent,
            "FakeSynthWorker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));

        while let Some(job) = self.jobs.recv().await {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::error!("Failed to acquire semaphore permit");
                break;
            };

            let bus = self.bus.clone();
            let codec = self.codec.clone();
            let config = self.config.clone();
            let worker_id = self.worker_id.clone();

            tokio::spawn(async move {
                let _permit = permit;
                Self::process_job(job, &bus, codec.as_ref(), &config, &worker_id).await;
            });
        }

        tracing::info!(worker_id = %self.worker_id, "FakeSynthWorker stopped");
    }

    async fn process_job(
        job: JobDescriptor,
        bus: &ChannelResponseBus,
        codec: &dyn AudioCodecPort,
        config: &FakeSynthWorkerConfig,
        worker_id: &str,
    ) {
        let started = Instant::now();
        if config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.latency_ms)).await;
        }

        let response = match Self::render(&job, codec, config, worker_id, started) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(correlation_id = %job.correlation_id, error = %e, "Failed to render job");
                return;
            }
        };

        tracing::debug!(
            correlation_id = %job.correlation_id,
            speaker = %job.profile.speaker,
            length = response.payload.length,
            "FakeSynthWorker: publishing silence"
        );
        if let Err(e) = bus.publish(response).await {
            tracing::warn!(correlation_id = %job.correlation_id, error = %e, "Failed to publish response");
        }
    }

    fn render(
        job: &JobDescriptor,
        codec: &dyn AudioCodecPort,
        config: &FakeSynthWorkerConfig,
        worker_id: &str,
        started: Instant,
    ) -> Result<JobResponse, CodecError> {
        let duration_ms = job.text.chars().count() as u64 * config.ms_per_char;
        let clip = PcmClip::silence(PcmFormat::mono16(config.sample_rate), duration_ms);
        let wav = codec.encode(&clip)?;

        Ok(JobResponse {
            correlation_id: job.correlation_id.clone(),
            worker_id: Some(worker_id.to_string()),
            content_length: wav.len() as u64,
            payload: ResponsePayload {
                data: BASE64.encode(&wav),
                length: duration_ms as f64 / 1000.0,
                speaker: job.profile.speaker.clone(),
            },
            time: started.elapsed().as_secs_f64(),
        })
    }
}
