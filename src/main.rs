//! Yapper - 聊天消息 TTS 服务
//!
//! 启动顺序：配置 → 日志 → 词表与流水线 → 停顿素材 → 队列与响应总线
//! → 解复用任务 → 编排器 → HTTP 服务

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use yapper::application::{
    spawn_demultiplexer, CorrelationTable, Orchestrator, OrchestratorConfig, WorkQueuePort,
};
use yapper::config::{load_config, print_config, LogConfig, QueueKind};
use yapper::domain::{Lexicon, PcmFormat, PipelineOptions, TextPipeline};
use yapper::infrastructure::adapters::{
    load_pause_clips, ChannelResponseBus, FileVoiceCatalog, HttpWorkQueue, HttpWorkQueueConfig,
    InMemoryWorkQueue, SilentPauses, WavCodec,
};
use yapper::infrastructure::http::{AppState, HttpServer, ServerConfig};
use yapper::infrastructure::{FakeSynthWorker, FakeSynthWorkerConfig};

/// 队列与响应总线的缓冲大小
const CHANNEL_CAPACITY: usize = 1024;

fn init_logging(log: &LogConfig) {
    let log_filter = format!("{},yapper={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log);

    tracing::info!("Yapper - 聊天消息 TTS 服务");
    print_config(&config);

    // 词表与文本流水线
    let lexicon = Lexicon::load(config.pipeline.lexicon_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load lexicon: {}", e))?;
    let swaps = config.pipeline.max_voice_swaps;
    let pipeline = Arc::new(TextPipeline::new(
        Arc::new(lexicon),
        PipelineOptions {
            clause_limit: config.pipeline.clause_limit,
            max_voice_swaps: (swaps > 0).then_some(swaps),
            long_token_limit: config.pipeline.long_token_limit,
        },
    ));

    // 停顿素材
    let codec = Arc::new(WavCodec::new());
    let pauses = load_pause_clips(
        config.audio.pause_dir.as_deref(),
        codec.as_ref(),
        SilentPauses {
            format: PcmFormat::mono16(config.audio.sample_rate),
            short_ms: config.audio.short_pause_ms,
            medium_ms: config.audio.medium_pause_ms,
            long_ms: config.audio.long_pause_ms,
        },
    )?;

    let catalog = Arc::new(FileVoiceCatalog::new(&config.catalog.path));
    let bus = Arc::new(ChannelResponseBus::new(CHANNEL_CAPACITY));

    // 任务队列
    let queue: Arc<dyn WorkQueuePort> = match config.queue.kind {
        QueueKind::Http => {
            let queue_config = HttpWorkQueueConfig::new(&config.queue.url)
                .with_timeout(config.queue.timeout_secs)
                .with_response_topic(&config.queue.response_topic);
            Arc::new(HttpWorkQueue::new(queue_config)?)
        }
        QueueKind::Fake => {
            let (queue, jobs) =
                InMemoryWorkQueue::new(CHANNEL_CAPACITY, &config.queue.response_topic);
            FakeSynthWorker::new(
                jobs,
                bus.clone(),
                codec.clone(),
                FakeSynthWorkerConfig {
                    sample_rate: config.audio.sample_rate,
                    latency_ms: config.queue.fake_latency_ms,
                    ..Default::default()
                },
            )
            .spawn();
            tracing::warn!("Using in-process fake synthesis worker");
            Arc::new(queue)
        }
    };

    // 唯一的响应订阅
    let table = CorrelationTable::new().arc();
    let demultiplexer = spawn_demultiplexer(bus.clone(), table.clone()).await?;

    let orchestrator = Arc::new(Orchestrator::new(
        queue,
        codec.clone(),
        table,
        Arc::new(pauses),
        OrchestratorConfig {
            request_timeout: config.orchestrator.request_timeout(),
            padding_clips: config.audio.padding_clips,
        },
    ));

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        catalog,
        pipeline,
        orchestrator,
        codec,
        bus.clone(),
        CancellationToken::new(),
    );
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    bus.close();
    if let Err(e) = demultiplexer.await {
        tracing::warn!(error = %e, "Demultiplexer task ended abnormally");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
