//! Yapper - 聊天消息 TTS 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 文本流水线：预处理、覆盖、音色切换、货币、数字、缩写、单词、分句、清理
//! - 音色、片段、PCM 音频与停顿素材
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VoiceCatalog, WorkQueue, ResponseBus, AudioCodec）
//! - Orchestrator: 去重派发、响应解复用、按序拼接
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 音色目录、WAV 编解码、任务队列、响应总线
//! - Worker: 进程内 FakeSynthWorker

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
