//! In-Memory Voice Catalog

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{CatalogError, VoiceCatalogPort};
use crate::domain::Voice;

/// 内存音色目录，可在运行时整体替换
#[derive(Debug, Default)]
pub struct InMemoryVoiceCatalog {
    voices: RwLock<Vec<Voice>>,
}

impl InMemoryVoiceCatalog {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices: RwLock::new(voices),
        }
    }

    pub async fn replace(&self, voices: Vec<Voice>) {
        *self.voices.write().await = voices;
    }
}

#[async_trait]
impl VoiceCatalogPort for InMemoryVoiceCatalog {
    async fn snapshot(&self) -> Result<Vec<Voice>, CatalogError> {
        Ok(self.voices.read().await.clone())
    }
}
