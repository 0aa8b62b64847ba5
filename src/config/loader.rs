//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, QueueKind};
use crate::domain::pipeline::{MAX_CLAUSE_LIMIT, MIN_CLAUSE_LIMIT};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `YAPPER_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `YAPPER_SERVER__PORT=8080`
/// - `YAPPER_QUEUE__KIND=fake`
/// - `YAPPER_QUEUE__URL=http://queue:8100`
/// - `YAPPER_PIPELINE__CLAUSE_LIMIT=120`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("queue.kind", "http")?
        .set_default("queue.url", "http://localhost:8100")?
        .set_default("queue.timeout_secs", 10)?
        .set_default("queue.response_topic", "tts:responses")?
        .set_default("queue.fake_latency_ms", 200)?
        .set_default("catalog.path", "data/voices.toml")?
        .set_default("audio.padding_clips", 5)?
        .set_default("audio.sample_rate", 22050)?
        .set_default("audio.short_pause_ms", 75)?
        .set_default("audio.medium_pause_ms", 150)?
        .set_default("audio.long_pause_ms", 200)?
        .set_default("pipeline.clause_limit", 60)?
        .set_default("pipeline.max_voice_swaps", 5)?
        .set_default("pipeline.long_token_limit", 20)?
        .set_default("orchestrator.request_timeout_secs", 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: YAPPER_QUEUE__URL=http://queue:8100
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("YAPPER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.queue.kind == QueueKind::Http && config.queue.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Queue URL cannot be empty".to_string(),
        ));
    }

    if config.queue.response_topic.is_empty() {
        return Err(ConfigError::ValidationError(
            "Response topic cannot be empty".to_string(),
        ));
    }

    let limit = config.pipeline.clause_limit;
    if !(MIN_CLAUSE_LIMIT..=MAX_CLAUSE_LIMIT).contains(&limit) {
        return Err(ConfigError::ValidationError(format!(
            "Clause limit must be between {} and {}, got {}",
            MIN_CLAUSE_LIMIT, MAX_CLAUSE_LIMIT, limit
        )));
    }

    if config.orchestrator.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Request timeout cannot be 0".to_string(),
        ));
    }

    if config.audio.sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Sample rate cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!(
        "Worker Callback: {}/api/responses",
        config.server.public_base_url()
    );
    tracing::info!("Queue: {:?} ({})", config.queue.kind, config.queue.url);
    tracing::info!("Response Topic: {}", config.queue.response_topic);
    tracing::info!("Voice Catalog: {:?}", config.catalog.path);
    match &config.audio.pause_dir {
        Some(dir) => tracing::info!("Pause Clips: {:?}", dir),
        None => tracing::info!("Pause Clips: silence @ {} Hz", config.audio.sample_rate),
    }
    tracing::info!("Clause Limit: {}", config.pipeline.clause_limit);
    tracing::info!("Max Voice Swaps: {}", config.pipeline.max_voice_swaps);
    if let Some(path) = &config.pipeline.lexicon_path {
        tracing::info!("Lexicon Overlay: {:?}", path);
    }
    tracing::info!(
        "Request Timeout: {}s",
        config.orchestrator.request_timeout_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_clause_limit_range() {
        let mut config = AppConfig::default();
        config.pipeline.clause_limit = 59;
        assert!(validate_config(&config).is_err());
        config.pipeline.clause_limit = 250;
        assert!(validate_config(&config).is_ok());
        config.pipeline.clause_limit = 251;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.orchestrator.request_timeout_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_url_allowed_for_fake_queue() {
        let mut config = AppConfig::default();
        config.queue.url = String::new();
        assert!(validate_config(&config).is_err());
        config.queue.kind = QueueKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yapper.toml");
        std::fs::write(
            &path,
            r#"
[queue]
kind = "fake"

[pipeline]
clause_limit = 120
lexicon_path = "lexicon.toml"

[audio]
pause_dir = "pauses"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.queue.kind, QueueKind::Fake);
        assert_eq!(config.pipeline.clause_limit, 120);
        assert_eq!(config.pipeline.max_voice_swaps, 5);
        assert_eq!(
            config.pipeline.lexicon_path.as_deref(),
            Some(Path::new("lexicon.toml"))
        );
        assert_eq!(config.audio.pause_dir.as_deref(), Some(Path::new("pauses")));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yapper.toml");
        std::fs::write(&path, "[pipeline]\nclause_limit = 10\n").unwrap();
        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
