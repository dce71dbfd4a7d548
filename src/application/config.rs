// ============================================================
// Layer 2 — Codec Configuration
// ============================================================
// Everything needed to rebuild the same codec in a later run:
//
//   words_in_sentence: rows per line matrix (L)
//   vocab_path       : embedding table (JSON, or word2vec text)
//   dimension        : vector length (D) when building a vocabulary
//   seed             : RNG seed when building a vocabulary
//
// Serialisable so `build-vocab` can save it next to the table
// and later commands can reload it with --config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

use crate::data::{batcher::ConversationBatcher, line_codec::LineCodec};
use crate::infra::embedding_store::EmbeddingTable;

/// CPU backend used by the command-line tools
pub type CodecBackend = burn::backend::NdArray;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub words_in_sentence: usize,
    pub vocab_path:        String,
    pub dimension:         usize,
    pub seed:              u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            words_in_sentence: 20,
            vocab_path:        "vocab.json".to_string(),
            // Matches the pretrained word2vec vectors
            dimension:         300,
            seed:              42,
        }
    }
}

impl CodecConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved codec config to '{}'", path.display());
        Ok(())
    }

    /// Load the embedding table named by `vocab_path`.
    /// `.json` files are read as saved tables, anything else as word2vec text.
    pub fn load_vocabulary(&self) -> Result<EmbeddingTable> {
        let path  = Path::new(&self.vocab_path);
        let table = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            EmbeddingTable::load_json(path)
        } else {
            EmbeddingTable::load_text(path)
        };
        table.with_context(|| {
            format!(
                "Cannot load vocabulary '{}'. Have you run 'build-vocab' first?",
                self.vocab_path
            )
        })
    }

    pub fn build_batcher(&self) -> Result<ConversationBatcher<CodecBackend>> {
        let table = Arc::new(self.load_vocabulary()?);
        let codec = LineCodec::new(table, self.words_in_sentence, Default::default())?;
        Ok(ConversationBatcher::new(codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec_config.json");
        let cfg  = CodecConfig { words_in_sentence: 7, ..CodecConfig::default() };
        cfg.save(&path).unwrap();
        assert_eq!(CodecConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn test_missing_vocabulary_has_context() {
        let cfg = CodecConfig { vocab_path: "/nonexistent/vocab.json".into(), ..CodecConfig::default() };
        let err = cfg.load_vocabulary().unwrap_err();
        assert!(err.to_string().contains("build-vocab"));
    }
}
