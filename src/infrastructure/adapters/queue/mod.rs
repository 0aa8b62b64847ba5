//! Queue Adapter - 任务队列与响应总线实现

mod channel_bus;
mod http_work_queue;
mod memory;

pub use channel_bus::ChannelResponseBus;
pub use http_work_queue::{HttpWorkQueue, HttpWorkQueueConfig};
pub use memory::InMemoryWorkQueue;
