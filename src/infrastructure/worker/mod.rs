//! Worker Layer - 后台任务处理
//!
//! FakeSynthWorker：进程内合成 worker

mod fake_synth_worker;

pub use fake_synth_worker::{FakeSynthWorker, FakeSynthWorkerConfig};
