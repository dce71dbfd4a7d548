// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types, traits and errors that describe what the
// codec works with. The rest of the crate is built on these.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// The word-vector capability is defined here as a trait so
// the codec never depends on a particular embedding model.

/// Tokens, word vectors and decoded lines
pub mod token;

/// Capability traits consumed by the codec
pub mod traits;

/// The crate-wide error type
pub mod error;
