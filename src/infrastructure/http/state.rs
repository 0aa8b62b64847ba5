//! Application State
//!
//! 包含所有 Command/Query Handlers 与响应总线

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::{
    AudioCodecPort, ListRequestsHandler, NormalizeHandler, Orchestrator, SynthesizeHandler,
    VoiceCatalogPort,
};
use crate::domain::TextPipeline;
use crate::infrastructure::adapters::ChannelResponseBus;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    /// 外部 worker 回调写入的响应总线
    pub bus: Arc<ChannelResponseBus>,
    /// 服务关闭时取消所有进行中的请求
    pub shutdown: CancellationToken,

    // ========== Command Handlers ==========
    pub synthesize_handler: SynthesizeHandler,

    // ========== Query Handlers ==========
    pub normalize_handler: Arc<NormalizeHandler>,
    pub list_requests_handler: ListRequestsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        catalog: Arc<dyn VoiceCatalogPort>,
        pipeline: Arc<TextPipeline>,
        orchestrator: Arc<Orchestrator>,
        codec: Arc<dyn AudioCodecPort>,
        bus: Arc<ChannelResponseBus>,
        shutdown: CancellationToken,
    ) -> Self {
        let normalize_handler = Arc::new(NormalizeHandler::new(catalog, pipeline));
        Self {
            bus,
            shutdown,
            synthesize_handler: SynthesizeHandler::new(
                normalize_handler.clone(),
                orchestrator.clone(),
                codec,
            ),
            normalize_handler,
            list_requests_handler: ListRequestsHandler::new(orchestrator.registry().clone()),
        }
    }
}
