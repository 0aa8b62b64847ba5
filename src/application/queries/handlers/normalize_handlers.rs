//! Normalize Query Handler

use std::sync::Arc;

use crate::application::error::SynthesisError;
use crate::application::ports::VoiceCatalogPort;
use crate::application::queries::NormalizeQuery;
use crate::domain::{TextPipeline, VoicePart, VoiceRoster};

/// NormalizeQuery Handler
///
/// 目录快照 → 音色名单 → 文本流水线
pub struct NormalizeHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
    pipeline: Arc<TextPipeline>,
}

impl NormalizeHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>, pipeline: Arc<TextPipeline>) -> Self {
        Self { catalog, pipeline }
    }

    pub async fn handle(&self, query: NormalizeQuery) -> Result<Vec<VoicePart>, SynthesisError> {
        let snapshot = self.catalog.snapshot().await?;
        let roster = VoiceRoster::resolve(
            &snapshot,
            query.default_voice.as_deref(),
            query.voices.as_deref(),
        )?;

        let parts = self.pipeline.process(&query.text, query.source, &roster);
        tracing::debug!(
            default_voice = %roster.default_voice().name,
            voices = roster.voices().len(),
            parts = parts.len(),
            "Text normalized"
        );
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CatalogError;
    use crate::domain::{Lexicon, PipelineOptions, SynthesisParameters, Voice};
    use crate::infrastructure::adapters::catalog::InMemoryVoiceCatalog;
    use async_trait::async_trait;

    fn handler(voices: Vec<Voice>) -> NormalizeHandler {
        let pipeline = TextPipeline::new(Arc::new(Lexicon::default()), PipelineOptions::default());
        NormalizeHandler::new(Arc::new(InMemoryVoiceCatalog::new(voices)), Arc::new(pipeline))
    }

    fn reader(name: &str) -> Voice {
        Voice::reader(name, SynthesisParameters::default())
    }

    #[tokio::test]
    async fn test_voice_switching() {
        let handler = handler(vec![reader("alice"), reader("bob")]);
        let parts = handler
            .handle(NormalizeQuery {
                text: "alice: hello bob: world".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let summary: Vec<_> = parts
            .iter()
            .map(|p| (p.voice.name.as_str(), p.value.as_str()))
            .collect();
        assert_eq!(summary, vec![("alice", "hello"), ("bob", "world")]);
        assert_eq!(parts.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_default_voice_from_request() {
        let handler = handler(vec![reader("alice"), reader("bob")]);
        let parts = handler
            .handle(NormalizeQuery {
                text: "hi".to_string(),
                default_voice: Some("Bob".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(parts[0].voice.name, "bob");
    }

    #[tokio::test]
    async fn test_unknown_voice_is_invalid() {
        let handler = handler(vec![reader("alice")]);
        let err = handler
            .handle(NormalizeQuery {
                text: "hi".to_string(),
                voices: Some(vec!["nobody".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidRequest(_)));
    }

    struct DownCatalog;

    #[async_trait]
    impl VoiceCatalogPort for DownCatalog {
        async fn snapshot(&self) -> Result<Vec<Voice>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_catalog_down() {
        let pipeline = TextPipeline::new(Arc::new(Lexicon::default()), PipelineOptions::default());
        let handler = NormalizeHandler::new(Arc::new(DownCatalog), Arc::new(pipeline));
        let err = handler
            .handle(NormalizeQuery {
                text: "hi".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::DependencyUnavailable(_)));
    }
}
