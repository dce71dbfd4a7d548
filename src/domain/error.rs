// ============================================================
// Layer 3 — Codec Error Type
// ============================================================
// Every fallible operation in the library layers returns
// CodecError. The application and CLI layers wrap it in
// anyhow::Error with extra context.
//
// Over-length lines and unknown words are NOT errors:
// they are handled by truncation and fallback vectors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a sequence model.
///
/// The inference adapter propagates it unchanged inside
/// `CodecError::Prediction`.
#[derive(Debug, Error)]
#[error("prediction failed: {message}")]
pub struct PredictionError {
    pub message: String,
}

impl PredictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// A conversation, tensor or vocabulary file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Zero lines were given where at least one is required.
    #[error("cannot build a tensor from an empty batch of lines")]
    EmptyBatch,

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// The word-vector capability produced a vector of the wrong length.
    #[error("word vector has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("tensor has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual:   Vec<usize>,
    },

    #[error("words-in-sentence capacity must be at least 1")]
    InvalidCapacity,

    #[error("word vector dimension must be at least 1")]
    InvalidDimension,

    #[error("vocabulary is empty")]
    EmptyVocabulary,

    /// Malformed tensor or embedding text file.
    #[error("cannot parse '{path}' line {line}: {message}")]
    Parse {
        path:    PathBuf,
        line:    usize,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("tokenization error: {0}")]
    Tokenization(String),

    /// Burn could not hand tensor values back to the host.
    #[error("cannot read tensor data: {0}")]
    TensorData(String),
}

impl CodecError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodecError::Io { path: path.into(), source }
    }
}
