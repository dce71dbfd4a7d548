// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//   embedding_store.rs: EmbeddingTable, the in-repo word-vector
//                        codec: built from a corpus or loaded
//                        from word2vec text / JSON
//
//   tensor_store.rs   : conversation tensors as delimited text
//                        with a shape header

/// Word ↔ vector table with cosine reverse lookup
pub mod embedding_store;

/// Self-describing flat-text tensor files
pub mod tensor_store;
