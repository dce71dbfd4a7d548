// ============================================================
// Layer 5 — Inference Adapter
// ============================================================
// Drives a SequenceModel with encoded text and decodes its
// output back into a reply.
//
//   single query:   text → [1, L, D] → predict → row 0    → reply
//   with history:   N lines → [N, L, D] → predict → row N-1 → reply
//
// The model is assumed to produce one output matrix per input
// line; the last output row answers the most recent turn.
// Model failures are returned unchanged, with no retry.
use burn::tensor::backend::Backend;
use std::sync::Arc;

use crate::data::batcher::{ConversationBatcher, ConversationTensor};
use crate::domain::error::CodecError;
use crate::domain::token::DecodedLine;
use crate::ml::model::SequenceModel;

pub struct InferenceAdapter<B: Backend> {
    model:   Arc<dyn SequenceModel<B>>,
    batcher: ConversationBatcher<B>,
}

impl<B: Backend> InferenceAdapter<B> {
    pub fn new(model: Arc<dyn SequenceModel<B>>, batcher: ConversationBatcher<B>) -> Self {
        Self { model, batcher }
    }

    pub fn batcher(&self) -> &ConversationBatcher<B> {
        &self.batcher
    }

    /// Reply to a single line with no conversation history.
    pub fn reply_to_query(&self, text: &str) -> Result<String, CodecError> {
        Ok(self.reply_line_to_query(text)?.text)
    }

    pub fn reply_line_to_query(&self, text: &str) -> Result<DecodedLine, CodecError> {
        let matrix = self.batcher.codec().encode(text, false)?;
        let input  = matrix.unsqueeze::<3>();
        let output = self.predict(input)?;
        self.batcher.decode_row(output, 0)
    }

    /// Reply to the most recent of `past_lines`, giving the model the whole history.
    pub fn reply_to_history<S: AsRef<str>>(&self, past_lines: &[S]) -> Result<String, CodecError> {
        Ok(self.reply_line_to_history(past_lines)?.text)
    }

    pub fn reply_line_to_history<S: AsRef<str>>(&self, past_lines: &[S]) -> Result<DecodedLine, CodecError> {
        let input  = self.batcher.encode_lines(past_lines)?;
        let output = self.predict(input)?;
        let last   = output.dims()[0] - 1;
        self.batcher.decode_row(output, last)
    }

    /// Run the model and check its output has a non-empty batch of [L, D] matrices.
    fn predict(&self, input: ConversationTensor<B>) -> Result<ConversationTensor<B>, CodecError> {
        let output = self.model.predict(input)?;
        tracing::debug!("Shape of reply tensor: {:?}", output.dims());

        let [lines, words, dimension] = output.dims();
        let codec = self.batcher.codec();
        if lines == 0 || words != codec.words_in_sentence() || dimension != codec.dimension() {
            return Err(CodecError::ShapeMismatch {
                expected: vec![lines.max(1), codec.words_in_sentence(), codec.dimension()],
                actual:   vec![lines, words, dimension],
            });
        }
        Ok(output)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::line_codec::LineCodec;
    use crate::domain::error::PredictionError;
    use crate::infra::embedding_store::EmbeddingTable;
    use crate::ml::model::IdentityModel;
    use burn::tensor::Tensor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestBackend = burn::backend::NdArray;

    const WORDS: usize     = 8;
    const DIMENSION: usize = 24;

    fn batcher() -> ConversationBatcher<TestBackend> {
        let corpus = vec![
            "hello how are you".to_string(),
            "i am fine".to_string(),
            "what is your name?".to_string(),
        ];
        let table = Arc::new(EmbeddingTable::from_corpus(&corpus, DIMENSION, 11).unwrap());
        ConversationBatcher::new(LineCodec::new(table, WORDS, Default::default()).unwrap())
    }

    fn adapter(model: Arc<dyn SequenceModel<TestBackend>>) -> InferenceAdapter<TestBackend> {
        InferenceAdapter::new(model, batcher())
    }

    struct FailingModel;

    impl SequenceModel<TestBackend> for FailingModel {
        fn predict(&self, _input: Tensor<TestBackend, 3>) -> Result<Tensor<TestBackend, 3>, PredictionError> {
            Err(PredictionError::new("model exploded"))
        }
    }

    /// Returns a [batch, WORDS, 1] tensor, the wrong trailing shape.
    struct NarrowModel;

    impl SequenceModel<TestBackend> for NarrowModel {
        fn predict(&self, input: Tensor<TestBackend, 3>) -> Result<Tensor<TestBackend, 3>, PredictionError> {
            let [batch, words, _] = input.dims();
            Ok(Tensor::zeros([batch, words, 1], &input.device()))
        }
    }

    #[derive(Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    impl SequenceModel<TestBackend> for CountingModel {
        fn predict(&self, input: Tensor<TestBackend, 3>) -> Result<Tensor<TestBackend, 3>, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(input)
        }
    }

    #[test]
    fn test_reply_to_query_with_identity_model() {
        let adapter = adapter(Arc::new(IdentityModel));
        assert_eq!(adapter.reply_to_query("Hello how are you!").unwrap(), "hello how are you");
        // "," never appeared in the corpus
        assert_eq!(adapter.reply_to_query("hello, you").unwrap(), "hello UNK you");
    }

    #[test]
    fn test_reply_to_history_uses_last_row() {
        let model   = Arc::new(CountingModel::default());
        let adapter = adapter(model.clone());
        let history = ["hello how are you", "i am fine", "what is your name?"];

        assert_eq!(adapter.reply_to_history(&history).unwrap(), "what is your name ?");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_history_is_rejected() {
        let adapter = adapter(Arc::new(IdentityModel));
        let empty: [&str; 0] = [];
        assert!(matches!(adapter.reply_to_history(&empty), Err(CodecError::EmptyBatch)));
    }

    #[test]
    fn test_prediction_error_propagates() {
        let adapter = adapter(Arc::new(FailingModel));
        match adapter.reply_to_query("hello") {
            Err(CodecError::Prediction(e)) => assert_eq!(e.message, "model exploded"),
            other => panic!("expected prediction error, got {other:?}"),
        }
        assert!(matches!(adapter.reply_to_history(&["hello"]), Err(CodecError::Prediction(_))));
    }

    #[test]
    fn test_wrong_output_shape_is_rejected() {
        let adapter = adapter(Arc::new(NarrowModel));
        assert!(matches!(adapter.reply_to_query("hello"), Err(CodecError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_reply_line_reports_terminator() {
        let adapter = adapter(Arc::new(IdentityModel));
        let reply   = adapter.reply_line_to_query("i am fine").unwrap();
        assert!(reply.terminated);
    }
}
