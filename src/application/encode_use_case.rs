// ============================================================
// Layer 2 — Encode / Decode Use Cases
// ============================================================
// encode: conversation text file → tensor file
//   Step 1: Load the vocabulary named in the config
//   Step 2: Encode every line into an [N, L, D] tensor
//   Step 3: Write it with its shape header
//
// decode: tensor file → one line of text per matrix

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::config::{CodecBackend, CodecConfig};
use crate::domain::token::{DecodedLine, TensorShape};
use crate::infra::tensor_store::TensorStore;

pub struct EncodeUseCase {
    config: CodecConfig,
    input:  PathBuf,
    output: PathBuf,
}

impl EncodeUseCase {
    pub fn new(config: CodecConfig, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { config, input: input.into(), output: output.into() }
    }

    pub fn execute(&self) -> Result<TensorShape> {
        let batcher = self.config.build_batcher()?;
        let shape   = batcher
            .encode_file_to_storage(&self.input, &self.output)
            .with_context(|| format!("Cannot encode '{}'", self.input.display()))?;
        tracing::info!("Encoded '{}' as {}", self.input.display(), shape);
        Ok(shape)
    }
}

pub struct DecodeUseCase {
    config: CodecConfig,
    input:  PathBuf,
}

impl DecodeUseCase {
    pub fn new(config: CodecConfig, input: impl Into<PathBuf>) -> Self {
        Self { config, input: input.into() }
    }

    pub fn execute(&self) -> Result<Vec<DecodedLine>> {
        let batcher = self.config.build_batcher()?;
        let tensor  = TensorStore::read::<CodecBackend>(&self.input, batcher.codec().device())
            .with_context(|| format!("Cannot read tensor '{}'", self.input.display()))?;

        let lines = batcher.decode_tensor(tensor)?;
        let unterminated = lines.iter().filter(|l| !l.terminated).count();
        if unterminated > 0 {
            tracing::debug!("{} lines had no end-of-line marker", unterminated);
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::embedding_store::EmbeddingTable;

    #[test]
    fn test_encode_then_decode_file() {
        let dir   = tempfile::tempdir().unwrap();
        let vocab = dir.path().join("vocab.json");
        let chat  = dir.path().join("chat.txt");
        let out   = dir.path().join("chat.csv");

        let text = vec!["Hello, how are you?".to_string(), "Fine thanks".to_string()];
        EmbeddingTable::from_corpus(&text, 12, 5).unwrap().save_json(&vocab).unwrap();
        std::fs::write(&chat, text.join("\n")).unwrap();

        let cfg = CodecConfig {
            words_in_sentence: 8,
            vocab_path:        vocab.to_string_lossy().into_owned(),
            dimension:         12,
            seed:              5,
        };

        let shape = EncodeUseCase::new(cfg.clone(), &chat, &out).execute().unwrap();
        assert_eq!(shape, TensorShape::new(2, 8, 12));

        let decoded: Vec<String> = DecodeUseCase::new(cfg, &out)
            .execute()
            .unwrap()
            .into_iter()
            .map(|l| l.text)
            .collect();
        assert_eq!(decoded, vec!["hello , how are you ?", "fine thanks"]);
    }
}
