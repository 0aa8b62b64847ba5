//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping        GET   健康检查
//! - /api/synthesize  POST  合成消息（返回 audio/wav）
//! - /api/normalize   POST  规范化预览（返回片段列表）
//! - /api/responses   POST  外部 worker 结果回调（Response Bus 入口）
//! - /api/requests    GET   进行中的合成请求

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/synthesize", post(handlers::synthesize))
        .route("/normalize", post(handlers::normalize))
        .route("/responses", post(handlers::publish_response))
        .route("/requests", get(handlers::list_requests))
}
