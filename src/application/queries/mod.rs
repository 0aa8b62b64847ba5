//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：规范化预览与请求状态

mod normalize_queries;
mod request_queries;

pub mod handlers;

pub use normalize_queries::*;
pub use request_queries::*;
