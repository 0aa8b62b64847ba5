//! Request Handlers - 进行中的合成请求

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListRequests, RequestInfo};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 列出进行中的请求及其状态
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<RequestInfo>>> {
    Json(ApiResponse::success(
        state.list_requests_handler.handle(ListRequests),
    ))
}
