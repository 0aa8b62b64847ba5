//! Query Handlers 实现

mod normalize_handlers;
mod request_handlers;

pub use normalize_handlers::*;
pub use request_handlers::*;
