// ============================================================
// Layer 5 — ML Layer
// ============================================================
// The codec's view of a prediction model.
//
//   model.rs     : SequenceModel trait and the IdentityModel
//   inferencer.rs: InferenceAdapter: encode, predict, decode
//
// No model architecture or training lives in this crate; any
// burn model can be wrapped in SequenceModel by the caller.

/// The prediction capability consumed by the adapter
pub mod model;

/// Encode → predict → decode for single queries and histories
pub mod inferencer;
