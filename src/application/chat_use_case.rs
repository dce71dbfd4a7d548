// ============================================================
// Layer 2 — Chat Use Case
// ============================================================
// A small interactive loop over the inference adapter:
//
//   User: <line read from input>
//   Bot:  <decoded model reply>
//
// Without history every query is answered on its own. With
// history both sides of the conversation so far are encoded
// and the reply comes from the last output row.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::application::config::{CodecBackend, CodecConfig};
use crate::ml::inferencer::InferenceAdapter;
use crate::ml::model::{IdentityModel, SequenceModel};

pub struct ChatUseCase {
    adapter:     InferenceAdapter<CodecBackend>,
    use_history: bool,
}

impl ChatUseCase {
    /// Build a chat loop driven by the identity model.
    pub fn new(config: &CodecConfig, use_history: bool) -> Result<Self> {
        Self::with_model(config, Arc::new(IdentityModel), use_history)
    }

    pub fn with_model(
        config:      &CodecConfig,
        model:       Arc<dyn SequenceModel<CodecBackend>>,
        use_history: bool,
    ) -> Result<Self> {
        let batcher = config.build_batcher()?;
        Ok(Self { adapter: InferenceAdapter::new(model, batcher), use_history })
    }

    /// Run up to `turns` exchanges, stopping early at end of input.
    /// Returns the bot replies in order.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W, turns: usize) -> Result<Vec<String>> {
        let mut history = Vec::new();
        let mut replies = Vec::new();

        for _ in 0..turns {
            write!(output, "User: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).context("Cannot read user input")? == 0 {
                break;
            }
            let line = line.trim_end().to_string();

            let reply = if self.use_history {
                history.push(line);
                let reply = self.adapter.reply_to_history(&history)?;
                history.push(reply.clone());
                reply
            } else {
                self.adapter.reply_to_query(&line)?
            };

            writeln!(output, "Bot: {}", reply)?;
            replies.push(reply);
        }

        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::embedding_store::EmbeddingTable;

    fn config(dir: &std::path::Path) -> CodecConfig {
        let vocab  = dir.join("vocab.json");
        let corpus = vec!["hello how are you".to_string(), "good bye".to_string()];
        EmbeddingTable::from_corpus(&corpus, 16, 9).unwrap().save_json(&vocab).unwrap();
        CodecConfig {
            words_in_sentence: 6,
            vocab_path:        vocab.to_string_lossy().into_owned(),
            dimension:         16,
            seed:              9,
        }
    }

    #[test]
    fn test_chat_echoes_through_identity_model() {
        let dir  = tempfile::tempdir().unwrap();
        let chat = ChatUseCase::new(&config(dir.path()), false).unwrap();

        let mut out = Vec::new();
        let replies = chat.run("Hello how are you\nGood bye!\n".as_bytes(), &mut out, 3).unwrap();

        assert_eq!(replies, vec!["hello how are you", "good bye"]);
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Bot: good bye\n"));
    }

    #[test]
    fn test_chat_with_history_answers_latest_turn() {
        let dir  = tempfile::tempdir().unwrap();
        let chat = ChatUseCase::new(&config(dir.path()), true).unwrap();

        let replies = chat.run("hello\ngood bye\n".as_bytes(), std::io::sink(), 2).unwrap();
        assert_eq!(replies, vec!["hello", "good bye"]);
    }
}
