//! Catalog Adapter - 音色目录实现

mod file_catalog;
mod memory;

pub use file_catalog::FileVoiceCatalog;
pub use memory::InMemoryVoiceCatalog;
