//! Request Queries - 进行中的请求

/// 列出进行中的合成请求
#[derive(Debug, Clone)]
pub struct ListRequests;
