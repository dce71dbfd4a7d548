// ============================================================
// Layer 2 — Build Vocabulary Use Case
// ============================================================
// Builds an embedding table from a corpus file and saves it:
//
//   Step 1: Read the corpus, one conversation turn per line
//   Step 2: Give every distinct token a seeded random vector
//   Step 3: Save the table as JSON
//   Step 4: Save the codec config next to it

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::config::CodecConfig;
use crate::data::loader::ConversationLoader;
use crate::infra::embedding_store::EmbeddingTable;

pub struct VocabUseCase {
    config: CodecConfig,
    corpus: PathBuf,
}

impl VocabUseCase {
    pub fn new(config: CodecConfig, corpus: impl Into<PathBuf>) -> Self {
        Self { config, corpus: corpus.into() }
    }

    /// Returns the path of the saved config file.
    pub fn execute(&self) -> Result<PathBuf> {
        let cfg = &self.config;

        let lines = ConversationLoader::new()
            .load(&self.corpus)
            .with_context(|| format!("Cannot read corpus '{}'", self.corpus.display()))?;
        tracing::info!("Building vocabulary from {} lines", lines.len());

        let table = EmbeddingTable::from_corpus(&lines, cfg.dimension, cfg.seed)?;
        table.save_json(&cfg.vocab_path)?;

        let config_path = config_path_for(Path::new(&cfg.vocab_path));
        cfg.save(&config_path)?;

        tracing::info!(
            "Vocabulary of {} words saved to '{}'",
            table.len(),
            cfg.vocab_path
        );
        Ok(config_path)
    }
}

/// "out/vocab.json" → "out/codec_config.json"
pub fn config_path_for(vocab_path: &Path) -> PathBuf {
    vocab_path.with_file_name("codec_config.json")
}
