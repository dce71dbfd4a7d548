// ============================================================
// Layer 4 — Conversation Batcher
// ============================================================
// Stacks the encoded lines of a conversation into one tensor.
//
// How batching works here:
//   Input:  N lines of text
//   Output: tensor of shape [N, L, D]
//
//   Each line is encoded to L*D row-major values by the
//   LineCodec. We concatenate them in input order and reshape:
//   [line1_w1..., line1_wL..., line2_w1..., lineN_wL...] → [N, L, D]
//
// This is only valid because every line is already padded to
// exactly L rows; tensor[i] is identical to encode(lines[i]).
//
// A batch of zero lines is rejected with EmptyBatch rather
// than producing a degenerate [0, L, D] tensor. If any line
// fails to encode the whole batch fails.

use burn::tensor::{backend::Backend, Tensor, TensorData};
use std::path::Path;

use crate::data::line_codec::{tensor_values, LineCodec};
use crate::data::loader::ConversationLoader;
use crate::domain::error::CodecError;
use crate::domain::token::{DecodedLine, TensorShape};
use crate::infra::tensor_store::TensorStore;

/// A stack of encoded lines, shape [lines, words_in_sentence, dimension]
pub type ConversationTensor<B> = Tensor<B, 3>;

pub struct ConversationBatcher<B: Backend> {
    codec:  LineCodec<B>,
    loader: ConversationLoader,
}

impl<B: Backend> ConversationBatcher<B> {
    pub fn new(codec: LineCodec<B>) -> Self {
        Self { codec, loader: ConversationLoader::new() }
    }

    pub fn codec(&self) -> &LineCodec<B> {
        &self.codec
    }

    /// Encode every line and stack the matrices in input order.
    pub fn encode_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<ConversationTensor<B>, CodecError> {
        if lines.is_empty() {
            return Err(CodecError::EmptyBatch);
        }

        let words     = self.codec.words_in_sentence();
        let dimension = self.codec.dimension();

        let mut flat = Vec::with_capacity(lines.len() * words * dimension);
        for line in lines {
            flat.extend(self.codec.encode_values(line.as_ref(), false)?);
        }

        let tensor: ConversationTensor<B> = Tensor::from_data(
            TensorData::new(flat, [lines.len(), words, dimension]),
            self.codec.device(),
        );
        tracing::info!("Created a tensor of shape {:?}", tensor.dims());
        Ok(tensor)
    }

    /// Read a conversation file (one turn per line) and encode it.
    pub fn encode_file(&self, path: impl AsRef<Path>) -> Result<ConversationTensor<B>, CodecError> {
        let path   = path.as_ref();
        let lines  = self.loader.load(path)?;
        let tensor = self.encode_lines(&lines)?;
        tracing::info!(
            "Created a tensor of shape {:?} from file '{}'",
            tensor.dims(),
            path.display()
        );
        Ok(tensor)
    }

    /// Encode a conversation file and persist the tensor as delimited text.
    pub fn encode_file_to_storage(
        &self,
        path:        impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<TensorShape, CodecError> {
        let tensor = self.encode_file(path)?;
        TensorStore::write(output_path, tensor)
    }

    /// Decode the matrix at `index` along the batch axis.
    pub fn decode_row(&self, tensor: ConversationTensor<B>, index: usize) -> Result<DecodedLine, CodecError> {
        let [lines, words, dimension] = tensor.dims();
        if index >= lines || dimension != self.codec.dimension() {
            return Err(CodecError::ShapeMismatch {
                expected: vec![index + 1, words, self.codec.dimension()],
                actual:   vec![lines, words, dimension],
            });
        }

        let matrix = tensor
            .slice([index..index + 1, 0..words, 0..dimension])
            .reshape([words, dimension]);
        self.codec.decode_line(matrix)
    }

    /// Decode every matrix of a conversation tensor, in order.
    pub fn decode_tensor(&self, tensor: ConversationTensor<B>) -> Result<Vec<DecodedLine>, CodecError> {
        let [lines, words, dimension] = tensor.dims();
        if words == 0 || dimension != self.codec.dimension() {
            return Err(CodecError::ShapeMismatch {
                expected: vec![lines, self.codec.words_in_sentence(), self.codec.dimension()],
                actual:   vec![lines, words, dimension],
            });
        }

        let values = tensor_values(tensor)?;
        values
            .chunks(words * dimension)
            .map(|matrix| self.codec.decode_values(matrix))
            .collect()
    }
}
