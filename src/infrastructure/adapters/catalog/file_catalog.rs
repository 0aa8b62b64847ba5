//! File Voice Catalog - TOML 音色目录
//!
//! 每次请求重新读取文件，修改目录无需重启
//!
//! ```toml
//! [[voices]]
//! name = "alice"
//! speaker = "alice_v2"
//! taco_path = "/models/alice.pt"
//! pace = 1.1
//!
//! [[voices]]
//! name = "horn"
//! kind = "clip"
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::application::ports::{CatalogError, VoiceCatalogPort};
use crate::domain::Voice;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    voices: Vec<Voice>,
}

/// 文件音色目录
pub struct FileVoiceCatalog {
    path: PathBuf,
}

impl FileVoiceCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 解析目录内容，名称（忽略大小写）不得重复
    pub fn parse(raw: &str) -> Result<Vec<Voice>, CatalogError> {
        let file: CatalogFile =
            toml::from_str(raw).map_err(|e| CatalogError::Invalid(e.to_string()))?;

        let mut seen = HashSet::new();
        for voice in &file.voices {
            if voice.name.trim().is_empty() {
                return Err(CatalogError::Invalid("voice with empty name".to_string()));
            }
            if !seen.insert(voice.key()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate voice: {}",
                    voice.name
                )));
            }
        }
        Ok(file.voices)
    }
}

#[async_trait]
impl VoiceCatalogPort for FileVoiceCatalog {
    async fn snapshot(&self) -> Result<Vec<Voice>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CatalogError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let voices = Self::parse(&raw)?;
        tracing::debug!(path = %self.path.display(), voices = voices.len(), "Voice catalog loaded");
        Ok(voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SynthesisMode, VoiceKind};

    const CATALOG: &str = r#"
[[voices]]
name = "Alice"
speaker = "alice_v2"
taco_path = "/models/alice.pt"
pace = 1.1

[[voices]]
name = "bob"
fast_path = "/models/bob.onnx"
cmudict_path = "/models/cmudict.txt"

[[voices]]
name = "horn"
kind = "clip"
"#;

    #[test]
    fn test_parse() {
        let voices = FileVoiceCatalog::parse(CATALOG).unwrap();
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].parameters.speaker, "alice_v2");
        assert_eq!(voices[0].parameters.pace, 1.1);
        assert_eq!(voices[0].parameters.mode(), SynthesisMode::Precise);
        assert_eq!(voices[1].parameters.mode(), SynthesisMode::Fast);
        assert_eq!(voices[1].parameters.pace, 1.0);
        assert_eq!(voices[2].kind, VoiceKind::Clip);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let raw = "[[voices]]\nname = \"a\"\n[[voices]]\nname = \"A\"\n";
        assert!(matches!(
            FileVoiceCatalog::parse(raw),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_reread_per_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.toml");
        std::fs::write(&path, "[[voices]]\nname = \"alice\"\n").unwrap();

        let catalog = FileVoiceCatalog::new(&path);
        assert_eq!(catalog.snapshot().await.unwrap().len(), 1);

        std::fs::write(&path, CATALOG).unwrap();
        assert_eq!(catalog.snapshot().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let catalog = FileVoiceCatalog::new("/nonexistent/voices.toml");
        assert!(matches!(
            catalog.snapshot().await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
