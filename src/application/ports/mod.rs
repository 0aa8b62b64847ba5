//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_codec;
mod response_bus;
mod voice_catalog;
mod work_queue;

pub use audio_codec::{AudioCodecPort, CodecError};
pub use response_bus::{BusError, JobResponse, ResponseBusPort, ResponsePayload};
pub use voice_catalog::{CatalogError, VoiceCatalogPort};
pub use work_queue::{JobDescriptor, QueueError, SpeakerProfile, WorkQueuePort};
