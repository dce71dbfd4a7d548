// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands:
//   build-vocab: corpus file → embedding table (+ codec config)
//   encode     : conversation file → tensor file
//   decode     : tensor file → text, one line per matrix
//   chat       : interactive query / reply loop
//
// Commands that need a codec take either --config (a file
// written by build-vocab) or the individual flags, never both.

use clap::{Args, Subcommand};
use socrates::application::config::CodecConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an embedding table from a corpus file
    BuildVocab(BuildVocabArgs),

    /// Encode a conversation file into a tensor file
    Encode(EncodeArgs),

    /// Decode a tensor file back into text
    Decode(DecodeArgs),

    /// Chat through the identity model
    Chat(ChatArgs),
}

/// Codec flags shared by encode, decode and chat
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Codec config written by build-vocab; cannot be combined with the flags below
    #[arg(long)]
    pub config: Option<String>,

    /// Embedding table: .json from build-vocab, or word2vec text
    #[arg(long, default_value = "vocab.json", conflicts_with = "config")]
    pub vocab: String,

    /// Number of word rows in every line matrix
    #[arg(long, default_value_t = 20, conflicts_with = "config")]
    pub words_in_sentence: usize,
}

impl CodecArgs {
    /// Resolve to a CodecConfig from --config or from the flags.
    pub fn resolve(&self) -> anyhow::Result<CodecConfig> {
        match &self.config {
            Some(path) => CodecConfig::load(path),
            None       => Ok(CodecConfig {
                words_in_sentence: self.words_in_sentence,
                vocab_path:        self.vocab.clone(),
                ..CodecConfig::default()
            }),
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildVocabArgs {
    /// Text file with one conversation turn per line
    #[arg(long)]
    pub corpus: String,

    /// Where to write the embedding table
    #[arg(long, default_value = "vocab.json")]
    pub output: String,

    /// Length of every word vector
    #[arg(long, default_value_t = 300)]
    pub dimension: usize,

    /// Seed for the random word vectors
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Words-in-sentence value stored in the saved config
    #[arg(long, default_value_t = 20)]
    pub words_in_sentence: usize,
}

impl From<&BuildVocabArgs> for CodecConfig {
    fn from(a: &BuildVocabArgs) -> Self {
        CodecConfig {
            words_in_sentence: a.words_in_sentence,
            vocab_path:        a.output.clone(),
            dimension:         a.dimension,
            seed:              a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Conversation file, one turn per line
    #[arg(long)]
    pub input: String,

    /// Tensor file to write
    #[arg(long)]
    pub output: String,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Tensor file written by `encode`
    #[arg(long)]
    pub input: String,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Number of exchanges before exiting
    #[arg(long, default_value_t = 3)]
    pub turns: usize,

    /// Feed the whole conversation so far to the model
    #[arg(long)]
    pub history: bool,

    #[command(flatten)]
    pub codec: CodecArgs,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::{error::ErrorKind, Parser};

    #[test]
    fn test_config_conflicts_with_codec_flags() {
        for flag in [["--vocab", "other.json"], ["--words-in-sentence", "5"]] {
            let err = Cli::try_parse_from(
                ["socrates", "decode", "--input", "t.csv", "--config", "codec.json"]
                    .into_iter()
                    .chain(flag),
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_config_alone_parses() {
        let cli = Cli::try_parse_from(["socrates", "chat", "--config", "codec.json"]).unwrap();
        match cli.command {
            Commands::Chat(args) => assert_eq!(args.codec.config.as_deref(), Some("codec.json")),
            other                => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_without_config() {
        let cli = Cli::try_parse_from(["socrates", "encode", "--input", "a.txt", "--output", "a.csv", "--words-in-sentence", "7"])
            .unwrap();
        let Commands::Encode(args) = cli.command else { panic!("expected encode") };
        let config = args.codec.resolve().unwrap();
        assert_eq!(config.words_in_sentence, 7);
        assert_eq!(config.vocab_path, "vocab.json");
    }
}
