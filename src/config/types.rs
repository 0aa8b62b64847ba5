//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 任务队列配置
    #[serde(default)]
    pub queue: QueueConfig,

    /// 音色目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 文本流水线配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 编排器配置
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（外部 worker 回调 /api/responses 使用）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 队列实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// 外部 HTTP 任务队列
    #[default]
    Http,
    /// 进程内队列 + FakeSynthWorker
    Fake,
}

/// 任务队列配置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub kind: QueueKind,

    /// 队列服务基础 URL
    #[serde(default = "default_queue_url")]
    pub url: String,

    /// 投递超时时间（秒）
    #[serde(default = "default_queue_timeout")]
    pub timeout_secs: u64,

    /// 写入任务的响应地址
    #[serde(default = "default_response_topic")]
    pub response_topic: String,

    /// fake worker 的模拟推理延迟（毫秒）
    #[serde(default = "default_fake_latency")]
    pub fake_latency_ms: u64,
}

fn default_queue_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_queue_timeout() -> u64 {
    10
}

fn default_response_topic() -> String {
    "tts:responses".to_string()
}

fn default_fake_latency() -> u64 {
    200
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            kind: QueueKind::default(),
            url: default_queue_url(),
            timeout_secs: default_queue_timeout(),
            response_topic: default_response_topic(),
            fake_latency_ms: default_fake_latency(),
        }
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// TOML 目录文件，每次请求重新读取
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/voices.toml")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 停顿素材目录（short.wav / medium.wav / long.wav / lead.wav）
    /// 未设置时按下面的时长生成静音
    #[serde(default)]
    pub pause_dir: Option<PathBuf>,

    /// 首尾静音段数
    #[serde(default = "default_padding_clips")]
    pub padding_clips: usize,

    /// 生成静音时使用的采样率
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_short_pause")]
    pub short_pause_ms: u64,

    #[serde(default = "default_medium_pause")]
    pub medium_pause_ms: u64,

    #[serde(default = "default_long_pause")]
    pub long_pause_ms: u64,
}

fn default_padding_clips() -> usize {
    5
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_short_pause() -> u64 {
    75
}

fn default_medium_pause() -> u64 {
    150
}

fn default_long_pause() -> u64 {
    200
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            pause_dir: None,
            padding_clips: default_padding_clips(),
            sample_rate: default_sample_rate(),
            short_pause_ms: default_short_pause(),
            medium_pause_ms: default_medium_pause(),
            long_pause_ms: default_long_pause(),
        }
    }
}

/// 文本流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 单个片段的最大字符数（60..=250）
    #[serde(default = "default_clause_limit")]
    pub clause_limit: usize,

    /// 单条消息允许的音色切换次数，0 表示不限制
    #[serde(default = "default_max_voice_swaps")]
    pub max_voice_swaps: usize,

    /// 超过该长度的未知单词按字母拼读
    #[serde(default = "default_long_token_limit")]
    pub long_token_limit: usize,

    /// 词表覆盖文件（TOML）
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

fn default_clause_limit() -> usize {
    60
}

fn default_max_voice_swaps() -> usize {
    5
}

fn default_long_token_limit() -> usize {
    20
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clause_limit: default_clause_limit(),
            max_voice_swaps: default_max_voice_swaps(),
            long_token_limit: default_long_token_limit(),
            lexicon_path: None,
        }
    }
}

/// 编排器配置
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorSettings {
    /// 单个请求的截止时间（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl OrchestratorSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
