//! Response Ingress - 外部 worker 的结果回调
//!
//! Body: JobResponse JSON（camelCase）

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 写入响应总线，由解复用任务按 correlationId 分发
pub async fn publish_response(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.bus.publish_json(&body).await?;
    Ok(Json(ApiResponse::ok()))
}
