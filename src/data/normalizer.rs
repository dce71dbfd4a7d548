// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Turns a raw line of conversation into lowercase tokens before
// any vocabulary lookup happens.
//
// Steps (applied in order):
//   1. Keep only alphanumeric characters and the whitelist
//      . ? " , and space. Everything else is DROPPED, not
//      replaced, so "don't" becomes "dont" and "a\tb" becomes "ab".
//   2. Lowercase the filtered string.
//   3. Split with the BERT pre-tokenizer from the `tokenizers`
//      crate: whitespace separates words and every punctuation
//      mark becomes its own token.
//
// Example:
//   "Hello, how are you?!"  →  ["hello", ",", "how", "are", "you", "?"]

use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::domain::error::CodecError;
use crate::domain::token::Token;

/// Punctuation that survives filtering, besides alphanumerics.
const ALLOWED_PUNCTUATION: [char; 5] = ['.', '?', '"', ',', ' '];

pub struct TextNormalizer {
    splitter: BertPreTokenizer,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self { splitter: BertPreTokenizer }
    }

    /// Drop every character outside the whitelist and lowercase the rest.
    pub fn filter(&self, text: &str) -> String {
        text.chars()
            .filter(|c| c.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(c))
            .collect::<String>()
            .to_lowercase()
    }

    /// Clean `text` and split it into tokens.
    ///
    /// Empty or fully-filtered input yields an empty Vec.
    /// The only error path is the pre-tokenizer itself, which
    /// does not fail on plain strings.
    pub fn normalize(&self, text: &str) -> Result<Vec<Token>, CodecError> {
        let filtered = self.filter(text);
        if filtered.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut pretokenized = PreTokenizedString::from(filtered.as_str());
        self.splitter
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| CodecError::Tokenization(e.to_string()))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(piece, _, _)| piece.to_string())
            .collect())
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
