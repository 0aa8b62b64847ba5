//! Synthesize Handlers - 合成与规范化预览

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::{NormalizeQuery, SynthesizeCommand};
use crate::infrastructure::http::dto::{ApiResponse, TextRequest, VoicePartResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const DURATION_HEADER: &str = "x-yapper-duration-ms";
pub const PARTS_HEADER: &str = "x-yapper-parts";

/// 合成消息，成功时直接返回音频
///
/// 客户端断开时 handler future 被丢弃，请求的关联表条目随之释放
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Response, ApiError> {
    let command = SynthesizeCommand {
        text: req.text,
        source: req.source,
        default_voice: req.default_voice,
        voices: req.voices,
        cancel: state.shutdown.child_token(),
    };

    let result = state.synthesize_handler.handle(command).await?;

    Ok((
        [
            (header::CONTENT_TYPE, result.content_type.to_string()),
            (HeaderName::from_static(DURATION_HEADER), result.duration_ms.to_string()),
            (HeaderName::from_static(PARTS_HEADER), result.parts.to_string()),
        ],
        result.audio,
    )
        .into_response())
}

/// 只运行文本流水线
pub async fn normalize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ApiResponse<Vec<VoicePartResponse>>>, ApiError> {
    let query = NormalizeQuery {
        text: req.text,
        source: req.source,
        default_voice: req.default_voice,
        voices: req.voices,
    };

    let parts = state.normalize_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(
        parts.iter().map(VoicePartResponse::from).collect(),
    )))
}
