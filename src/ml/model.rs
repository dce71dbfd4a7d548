// ============================================================
// Layer 5 — Sequence Model Capability
// ============================================================
// The codec drives a prediction model but never defines one.
// Any model that maps a [batch, L, D] tensor to a tensor of
// the same convention implements SequenceModel.
//
// IdentityModel echoes its input. It is the stand-in used by
// the `chat` command and by tests of the inference adapter.

use burn::tensor::{backend::Backend, Tensor};

use crate::domain::error::PredictionError;

pub trait SequenceModel<B: Backend>: Send + Sync {
    /// input: [batch, L, D] → output: [batch, L, D]
    fn predict(&self, input: Tensor<B, 3>) -> Result<Tensor<B, 3>, PredictionError>;
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl<B: Backend> SequenceModel<B> for IdentityModel {
    fn predict(&self, input: Tensor<B, 3>) -> Result<Tensor<B, 3>, PredictionError> {
        Ok(input)
    }
}
