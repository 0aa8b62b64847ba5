//! Ping Handler
//!
//! 健康检查，附带进行中的请求数

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::application::ListRequests;
use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub in_flight: usize,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        in_flight: state.list_requests_handler.handle(ListRequests).len(),
    })
}
