//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod catalog;
pub mod codec;
pub mod queue;

pub use catalog::*;
pub use codec::*;
pub use queue::*;
