// ============================================================
// Layer 4 — Line Codec
// ============================================================
// Converts one line of text into a fixed-shape matrix of word
// vectors, and a matrix back into a line.
//
// Encoding a line with capacity L = 5:
//
//   "hi there, you"
//       │  normalise → ["hi", "there", ",", "you"]
//       ▼
//   row 0 : vec("hi")
//   row 1 : vec("there")
//   row 2 : vec(",")
//   row 3 : vec("you")
//   row 4 : vec("EOL")        ← padding
//
// Every matrix has exactly [L, D] elements: longer lines are
// cut at L tokens, shorter ones are padded with the EOL vector.
//
// Decoding walks the rows, maps each to its nearest word and
// stops at the first EOL. A matrix with no EOL row decodes all
// L rows, and DecodedLine::terminated reports that case.

use burn::tensor::{backend::Backend, Tensor, TensorData};
use std::sync::Arc;

use crate::data::normalizer::TextNormalizer;
use crate::domain::error::CodecError;
use crate::domain::token::{DecodedLine, WordVector, END_OF_LINE};
use crate::domain::traits::{TruncationObserver, WordVectorCodec};

/// One encoded line, shape [words_in_sentence, dimension]
pub type LineMatrix<B> = Tensor<B, 2>;

// ─── LogTruncation ────────────────────────────────────────────────────────────
/// Default observer: reports truncation as a tracing warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTruncation;

impl TruncationObserver for LogTruncation {
    fn on_truncate(&self, line: &str, token_count: usize, capacity: usize) {
        tracing::warn!(
            "Line '{}' has {} tokens, more than the limit of {}. Keeping the first {}",
            line.trim_end(),
            token_count,
            capacity,
            capacity
        );
    }
}

// ─── LineCodec ────────────────────────────────────────────────────────────────
pub struct LineCodec<B: Backend> {
    words_in_sentence:  usize,
    vectorizer:         Arc<dyn WordVectorCodec>,
    end_of_line_vector: WordVector,
    observer:           Arc<dyn TruncationObserver>,
    normalizer:         TextNormalizer,
    device:             B::Device,
}

impl<B: Backend> LineCodec<B> {
    /// Create a codec producing [words_in_sentence, vectorizer.dimension()] matrices.
    pub fn new(
        vectorizer:        Arc<dyn WordVectorCodec>,
        words_in_sentence: usize,
        device:            B::Device,
    ) -> Result<Self, CodecError> {
        if words_in_sentence == 0 {
            return Err(CodecError::InvalidCapacity);
        }
        if vectorizer.dimension() == 0 {
            return Err(CodecError::InvalidDimension);
        }

        let end_of_line_vector = vectorizer.word_to_vector(END_OF_LINE).into_vector();
        if end_of_line_vector.len() != vectorizer.dimension() {
            return Err(CodecError::DimensionMismatch {
                expected: vectorizer.dimension(),
                actual:   end_of_line_vector.len(),
            });
        }

        Ok(Self {
            words_in_sentence,
            vectorizer,
            end_of_line_vector,
            observer: Arc::new(LogTruncation),
            normalizer: TextNormalizer::new(),
            device,
        })
    }

    /// Replace the truncation observer.
    pub fn with_observer(mut self, observer: Arc<dyn TruncationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn words_in_sentence(&self) -> usize {
        self.words_in_sentence
    }

    pub fn dimension(&self) -> usize {
        self.vectorizer.dimension()
    }

    pub fn end_of_line_vector(&self) -> &[f32] {
        &self.end_of_line_vector
    }

    pub fn blank_vector(&self) -> WordVector {
        self.vectorizer.blank_vector()
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Encode a line into an [L, D] matrix.
    ///
    /// With `verbose` set, lines longer than L are reported to the
    /// observer before being cut. Truncation never fails.
    pub fn encode(&self, text: &str, verbose: bool) -> Result<LineMatrix<B>, CodecError> {
        let values = self.encode_values(text, verbose)?;
        Ok(Tensor::from_data(
            TensorData::new(values, [self.words_in_sentence, self.dimension()]),
            &self.device,
        ))
    }

    /// Row-major [L * D] values for one line.
    /// The batcher concatenates these to build a whole batch at once.
    pub(crate) fn encode_values(&self, text: &str, verbose: bool) -> Result<Vec<f32>, CodecError> {
        let tokens    = self.normalizer.normalize(text)?;
        let dimension = self.dimension();

        if verbose && tokens.len() > self.words_in_sentence {
            self.observer.on_truncate(text, tokens.len(), self.words_in_sentence);
        }

        let mut values = vec![0.0f32; self.words_in_sentence * dimension];
        let kept       = tokens.len().min(self.words_in_sentence);

        for (row, token) in tokens.iter().take(kept).enumerate() {
            let lookup = self.vectorizer.word_to_vector(token);
            if lookup.is_fallback() {
                tracing::debug!("Out-of-vocabulary token '{}', using fallback vector", token);
            }
            let vector = lookup.vector();
            if vector.len() != dimension {
                return Err(CodecError::DimensionMismatch {
                    expected: dimension,
                    actual:   vector.len(),
                });
            }
            values[row * dimension..(row + 1) * dimension].copy_from_slice(vector);
        }

        // Fill remaining rows with EOL
        for row in kept..self.words_in_sentence {
            values[row * dimension..(row + 1) * dimension].copy_from_slice(&self.end_of_line_vector);
        }

        Ok(values)
    }

    /// Decode a matrix into text, stopping at the first EOL row.
    pub fn decode(&self, matrix: LineMatrix<B>) -> Result<String, CodecError> {
        Ok(self.decode_line(matrix)?.text)
    }

    /// Like `decode`, but also reports whether an EOL row was found.
    pub fn decode_line(&self, matrix: LineMatrix<B>) -> Result<DecodedLine, CodecError> {
        let [rows, width] = matrix.dims();
        if width != self.dimension() {
            return Err(CodecError::ShapeMismatch {
                expected: vec![self.words_in_sentence, self.dimension()],
                actual:   vec![rows, width],
            });
        }

        let values = tensor_values(matrix)?;
        self.decode_values(&values)
    }

    pub(crate) fn decode_values(&self, values: &[f32]) -> Result<DecodedLine, CodecError> {
        let mut words = Vec::new();
        for vector in values.chunks(self.dimension()) {
            let word = self.vectorizer.vector_to_word(vector)?;
            if word == END_OF_LINE {
                return Ok(DecodedLine { text: words.join(" "), terminated: true });
            }
            words.push(word);
        }

        tracing::debug!("Decoded {} rows without reaching an end-of-line marker", words.len());
        Ok(DecodedLine { text: words.join(" "), terminated: false })
    }
}

/// Pull a tensor's values back to the host as f32.
pub(crate) fn tensor_values<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
) -> Result<Vec<f32>, CodecError> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| CodecError::TensorData(format!("{e:?}")))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::WordLookup;
    use crate::infra::embedding_store::EmbeddingTable;
    use std::sync::Mutex;

    type TestBackend = burn::backend::NdArray;

    const DIMENSION: usize = 50;

    fn table() -> Arc<EmbeddingTable> {
        let corpus = vec![
            "hello how are you".to_string(),
            "hi there".to_string(),
            "one two three four five six seven eight nine ten".to_string(),
            "eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty"
                .to_string(),
        ];
        Arc::new(EmbeddingTable::from_corpus(&corpus, DIMENSION, 42).unwrap())
    }

    fn codec(words_in_sentence: usize) -> LineCodec<TestBackend> {
        LineCodec::new(table(), words_in_sentence, Default::default()).unwrap()
    }

    fn rows(matrix: LineMatrix<TestBackend>) -> Vec<Vec<f32>> {
        tensor_values(matrix)
            .unwrap()
            .chunks(DIMENSION)
            .map(|r| r.to_vec())
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        notices: Mutex<Vec<(usize, usize)>>,
    }

    impl TruncationObserver for Recorder {
        fn on_truncate(&self, _line: &str, token_count: usize, capacity: usize) {
            self.notices.lock().unwrap().push((token_count, capacity));
        }
    }

    #[test]
    fn test_round_trip_short_line() {
        let codec  = codec(10);
        let matrix = codec.encode("hello how are you", false).unwrap();
        assert_eq!(matrix.dims(), [10, DIMENSION]);
        assert_eq!(codec.decode(matrix).unwrap(), "hello how are you");
    }

    #[test]
    fn test_round_trip_normalises_case_and_punctuation() {
        let codec  = codec(10);
        let matrix = codec.encode("Hello!! HOW are you", false).unwrap();
        assert_eq!(codec.decode(matrix).unwrap(), "hello how are you");
    }

    #[test]
    fn test_shape_is_fixed_for_long_input() {
        let codec  = codec(5);
        let long   = "one two three four five six seven eight nine ten \
                      eleven twelve thirteen fourteen fifteen sixteen seventeen \
                      eighteen nineteen twenty";
        let matrix = codec.encode(long, false).unwrap();
        assert_eq!(matrix.dims(), [5, DIMENSION]);
        assert_eq!(codec.decode(matrix).unwrap(), "one two three four five");
    }

    #[test]
    fn test_padding_rows_are_end_of_line() {
        let codec  = codec(4);
        let rows   = rows(codec.encode("hi there", false).unwrap());
        let eol    = codec.end_of_line_vector().to_vec();
        assert_ne!(rows[1], eol);
        assert_eq!(rows[2], eol);
        assert_eq!(rows[3], eol);
    }

    #[test]
    fn test_empty_line_is_all_padding() {
        let codec = codec(3);
        let eol   = codec.end_of_line_vector().to_vec();
        let rows  = rows(codec.encode("", false).unwrap());
        assert!(rows.iter().all(|r| *r == eol));

        let decoded = codec.decode_line(codec.encode("", false).unwrap()).unwrap();
        assert_eq!(decoded, DecodedLine { text: String::new(), terminated: true });
    }

    #[test]
    fn test_unknown_word_does_not_fail() {
        let codec  = codec(6);
        let matrix = codec.encode("hello woohoo you", false).unwrap();
        assert_eq!(codec.decode(matrix).unwrap(), "hello UNK you");
    }

    #[test]
    fn test_verbose_truncation_notifies_observer() {
        let recorder = Arc::new(Recorder::default());
        let codec    = codec(3).with_observer(recorder.clone());

        codec.encode("one two three four five six", false).unwrap();
        assert!(recorder.notices.lock().unwrap().is_empty());

        codec.encode("one two three four five six", true).unwrap();
        codec.encode("one two", true).unwrap();
        assert_eq!(*recorder.notices.lock().unwrap(), vec![(6, 3)]);
    }

    #[test]
    fn test_decode_stops_at_first_end_of_line() {
        let codec = codec(3);
        let table = table();
        let mut values = table.word_to_vector("hello").into_vector();
        values.extend(codec.end_of_line_vector());
        values.extend(table.word_to_vector("you").into_vector());

        let matrix = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(values, [3, DIMENSION]),
            codec.device(),
        );
        assert_eq!(codec.decode(matrix).unwrap(), "hello");
    }

    #[test]
    fn test_decode_without_terminator_keeps_every_row() {
        let codec  = codec(3);
        let hello  = table().word_to_vector("hello").into_vector();
        let values = hello.repeat(3);

        let matrix = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(values, [3, DIMENSION]),
            codec.device(),
        );
        let decoded = codec.decode_line(matrix).unwrap();
        assert_eq!(decoded.text, "hello hello hello");
        assert!(!decoded.terminated);
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        let codec  = codec(3);
        let matrix = Tensor::<TestBackend, 2>::zeros([3, 7], codec.device());
        assert!(matches!(codec.decode(matrix), Err(CodecError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = LineCodec::<TestBackend>::new(table(), 0, Default::default());
        assert!(matches!(result, Err(CodecError::InvalidCapacity)));
    }

    struct ZeroWidth;

    impl WordVectorCodec for ZeroWidth {
        fn dimension(&self) -> usize {
            0
        }

        fn word_to_vector(&self, _word: &str) -> WordLookup {
            WordLookup::Found(Vec::new())
        }

        fn vector_to_word(&self, _vector: &[f32]) -> Result<String, CodecError> {
            Ok(END_OF_LINE.to_string())
        }
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let result = LineCodec::<TestBackend>::new(Arc::new(ZeroWidth), 3, Default::default());
        assert!(matches!(result, Err(CodecError::InvalidDimension)));
    }

    #[test]
    fn test_blank_vector_is_zeros() {
        let codec = codec(2);
        assert_eq!(codec.blank_vector(), vec![0.0; DIMENSION]);
    }
}
