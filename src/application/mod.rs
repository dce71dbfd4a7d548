// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing task.
//
// Rules for this layer:
//   - No tensor math here
//   - No printing of results (that's Layer 1)
//   - Errors are anyhow::Error with context for the user

/// Codec settings shared by every command
pub mod config;

/// Corpus → embedding table
pub mod vocab_use_case;

/// Conversation file ↔ tensor file
pub mod encode_use_case;

/// Interactive query / reply loop
pub mod chat_use_case;
