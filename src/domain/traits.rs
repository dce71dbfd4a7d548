// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The codec consumes a word-embedding model but never builds
// one. Anything that can map word ↔ vector implements
// WordVectorCodec and can be handed to a LineCodec:
//
//   - EmbeddingTable → in-memory vocabulary (infra layer)
//   - a pretrained word2vec / GloVe model wrapped by a caller
//
// The truncation observer is the only side effect a LineCodec
// has, so it is injected as a trait too.

use crate::domain::error::CodecError;
use crate::domain::token::WordVector;

// ─── WordLookup ───────────────────────────────────────────────────────────────
/// Outcome of a word → vector lookup.
///
/// Out-of-vocabulary words are not an error: the capability
/// substitutes a deterministic fallback vector, and the variant
/// tells the caller that it did.
#[derive(Debug, Clone, PartialEq)]
pub enum WordLookup {
    /// The word is in the vocabulary
    Found(WordVector),

    /// The word is unknown; the vector is the capability's fallback
    Fallback(WordVector),
}

impl WordLookup {
    pub fn vector(&self) -> &WordVector {
        match self {
            WordLookup::Found(v) | WordLookup::Fallback(v) => v,
        }
    }

    pub fn into_vector(self) -> WordVector {
        match self {
            WordLookup::Found(v) | WordLookup::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, WordLookup::Fallback(_))
    }
}

// ─── WordVectorCodec ──────────────────────────────────────────────────────────
/// Maps words to fixed-dimension vectors and back.
///
/// Implementations must be deterministic: the same word always
/// yields the same vector, and the same vector always yields
/// the same nearest word.
pub trait WordVectorCodec: Send + Sync {
    /// Length of every vector this codec produces
    fn dimension(&self) -> usize;

    /// Look up the vector for a word.
    fn word_to_vector(&self, word: &str) -> WordLookup;

    /// Return the known word whose vector is most similar.
    fn vector_to_word(&self, vector: &[f32]) -> Result<String, CodecError>;

    /// An all-zero placeholder vector.
    fn blank_vector(&self) -> WordVector {
        vec![0.0; self.dimension()]
    }
}

// ─── TruncationObserver ───────────────────────────────────────────────────────
/// Notified when a verbose encode drops tokens beyond capacity.
pub trait TruncationObserver: Send + Sync {
    /// `token_count` is the full length of the normalised line,
    /// `capacity` the number of tokens that were kept.
    fn on_truncate(&self, line: &str, token_count: usize, capacity: usize);
}

/// Observer that ignores every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl TruncationObserver for SilentObserver {
    fn on_truncate(&self, _line: &str, _token_count: usize, _capacity: usize) {}
}
