// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a line of text and a tensor.
//
//   conversation file
//       │
//       ▼
//   ConversationLoader   → one String per turn
//       │
//       ▼
//   TextNormalizer       → lowercase tokens
//       │
//       ▼
//   LineCodec            → [L, D] matrix per line (EOL-padded)
//       │
//       ▼
//   ConversationBatcher  → [N, L, D] tensor
//
// Decoding runs the last two steps in reverse.
//
// Layering: infra builds on this layer (the embedding store
// tokenises with TextNormalizer, the tensor store uses
// tensor_values). The one call back into infra is
// ConversationBatcher::encode_file_to_storage, which hands its
// tensor to infra::tensor_store::TensorStore. Nothing else here
// imports infra outside tests.

/// Reads conversation files line by line
pub mod loader;

/// Character filtering and tokenisation
pub mod normalizer;

/// One line ↔ one fixed-shape matrix
pub mod line_codec;

/// Many lines ↔ one 3D tensor, plus file persistence
pub mod batcher;
