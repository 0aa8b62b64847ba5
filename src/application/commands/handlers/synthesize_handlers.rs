//! Synthesize Command Handler

use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::{SynthesizeCommand, SynthesizeResponse};
use crate::application::error::SynthesisError;
use crate::application::orchestrator::Orchestrator;
use crate::application::ports::AudioCodecPort;
use crate::application::queries::handlers::NormalizeHandler;
use crate::application::queries::NormalizeQuery;

/// SynthesizeCommand Handler
///
/// 规范化 → 编排合成 → 编码输出
pub struct SynthesizeHandler {
    normalizer: Arc<NormalizeHandler>,
    orchestrator: Arc<Orchestrator>,
    codec: Arc<dyn AudioCodecPort>,
}

impl SynthesizeHandler {
    pub fn new(
        normalizer: Arc<NormalizeHandler>,
        orchestrator: Arc<Orchestrator>,
        codec: Arc<dyn AudioCodecPort>,
    ) -> Self {
        Self {
            normalizer,
            orchestrator,
            codec,
        }
    }

    pub async fn handle(&self, cmd: SynthesizeCommand) -> Result<SynthesizeResponse, SynthesisError> {
        let started = Instant::now();
        let parts = self
            .normalizer
            .handle(NormalizeQuery {
                text: cmd.text,
                source: cmd.source,
                default_voice: cmd.default_voice,
                voices: cmd.voices,
            })
            .await?;

        if parts.is_empty() {
            return Err(SynthesisError::invalid("text normalizes to nothing"));
        }

        let clip = self.orchestrator.synthesize(&parts, &cmd.cancel).await?;
        let audio = self.codec.encode(&clip)?;

        tracing::info!(
            parts = parts.len(),
            duration_ms = clip.duration_ms(),
            bytes = audio.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Synthesis finished"
        );

        Ok(SynthesizeResponse {
            audio,
            content_type: self.codec.content_type(),
            duration_ms: clip.duration_ms(),
            parts: parts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::orchestrator::{spawn_demultiplexer, CorrelationTable, OrchestratorConfig};
    use crate::domain::{
        Lexicon, PauseClips, PcmFormat, PipelineOptions, SynthesisParameters, TextPipeline, Voice,
    };
    use crate::infrastructure::adapters::catalog::InMemoryVoiceCatalog;
    use crate::infrastructure::adapters::codec::WavCodec;
    use crate::infrastructure::adapters::queue::{ChannelResponseBus, InMemoryWorkQueue};
    use crate::infrastructure::worker::{FakeSynthWorker, FakeSynthWorkerConfig};
    use std::time::Duration;

    async fn handler() -> SynthesizeHandler {
        let voices = vec![
            Voice::reader("alice", SynthesisParameters::default()),
            Voice::reader("bob", SynthesisParameters::default()),
        ];
        let catalog = Arc::new(InMemoryVoiceCatalog::new(voices));
        let pipeline = TextPipeline::new(Arc::new(Lexicon::default()), PipelineOptions::default());
        let normalizer = Arc::new(NormalizeHandler::new(catalog, Arc::new(pipeline)));

        let (queue, jobs) = InMemoryWorkQueue::new(16, "tts:responses");
        let bus = Arc::new(ChannelResponseBus::new(16));
        let codec = Arc::new(WavCodec::new());
        FakeSynthWorker::new(
            jobs,
            bus.clone(),
            codec.clone(),
            FakeSynthWorkerConfig {
                sample_rate: 8000,
                ms_per_char: 10,
                latency_ms: 0,
                ..Default::default()
            },
        )
        .spawn();

        let table = CorrelationTable::new().arc();
        spawn_demultiplexer(bus, table.clone()).await.unwrap();

        let orchestrator = Orchestrator::new(
            Arc::new(queue),
            codec.clone(),
            table,
            Arc::new(PauseClips::silent(PcmFormat::mono16(8000), 75, 150, 200)),
            OrchestratorConfig {
                request_timeout: Duration::from_secs(5),
                padding_clips: 1,
            },
        );
        SynthesizeHandler::new(normalizer, Arc::new(orchestrator), codec)
    }

    #[tokio::test]
    async fn test_synthesize_end_to_end() {
        let handler = handler().await;
        let response = handler
            .handle(SynthesizeCommand {
                text: "alice: hello there. bob: $5.20".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.content_type, "audio/wav");
        assert_eq!(&response.audio[0..4], b"RIFF");
        assert_eq!(response.parts, 2);
        assert!(response.duration_ms > 0);
    }

    #[tokio::test]
    async fn test_synthesize_is_deterministic() {
        let handler = handler().await;
        let command = SynthesizeCommand {
            text: "i have 1234 apples. alice: and bob: 007 pears!".to_string(),
            ..Default::default()
        };
        let first = handler.handle(command.clone()).await.unwrap();
        let second = handler.handle(command).await.unwrap();
        assert_eq!(first.audio, second.audio);
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid() {
        let handler = handler().await;
        let err = handler
            .handle(SynthesizeCommand {
                text: "   ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidRequest(_)));
    }
}
