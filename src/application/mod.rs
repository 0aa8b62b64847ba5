//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceCatalog、WorkQueue、ResponseBus、AudioCodec）
//! - orchestrator: 任务派发、响应收集与音频拼接
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::SynthesizeHandler, SynthesizeCommand, SynthesizeResponse,
};

pub use error::SynthesisError;

pub use orchestrator::{
    spawn_demultiplexer, CorrelationTable, Orchestrator, OrchestratorConfig, RequestInfo,
    RequestRegistry, RequestState,
};

pub use ports::{
    // Audio codec
    AudioCodecPort,
    CodecError,
    // Response bus
    BusError,
    JobResponse,
    ResponseBusPort,
    ResponsePayload,
    // Voice catalog
    CatalogError,
    VoiceCatalogPort,
    // Work queue
    JobDescriptor,
    QueueError,
    SpeakerProfile,
    WorkQueuePort,
};

pub use queries::{
    handlers::{ListRequestsHandler, NormalizeHandler},
    ListRequests, NormalizeQuery,
};
