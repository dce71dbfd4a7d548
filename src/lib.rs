//! Text ↔ tensor codec for sequence models.
//!
//! Lines of conversation are normalised, mapped word by word
//! through a [`WordVectorCodec`](domain::traits::WordVectorCodec)
//! into fixed `[L, D]` matrices padded with the `EOL` vector,
//! and stacked into `[N, L, D]` burn tensors. Model output is
//! decoded back into text row by row, stopping at the first
//! `EOL`.
//!
//! Layers, innermost first:
//!
//! - [`domain`]     : tokens, capability traits, errors
//! - [`data`]       : normalizer, line codec, batcher
//! - [`ml`]         : sequence model trait and inference adapter
//! - [`infra`]      : embedding table and tensor persistence
//! - [`application`]: use cases behind the command-line tool

pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
pub mod application;

pub use data::batcher::{ConversationBatcher, ConversationTensor};
pub use data::line_codec::{LineCodec, LineMatrix};
pub use data::normalizer::TextNormalizer;
pub use domain::error::{CodecError, PredictionError};
pub use domain::traits::{WordLookup, WordVectorCodec};
pub use infra::embedding_store::EmbeddingTable;
pub use ml::inferencer::InferenceAdapter;
pub use ml::model::{IdentityModel, SequenceModel};
