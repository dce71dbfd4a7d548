// ============================================================
// Layer 3 — Token and Vector Types
// ============================================================
// A line of text travels through the codec as:
//
//   "Hello, how are you?"
//       │  normalise
//       ▼
//   ["hello", ",", "how", "are", "you", "?"]     ← Vec<Token>
//       │  word → vector
//       ▼
//   [[0.12, -0.4, ...], [...], ...]               ← Vec<WordVector>
//
// Both sentinels below are ordinary vocabulary entries, so they
// round-trip through a word-vector table like any other word.

use serde::{Deserialize, Serialize};

/// A normalised word or punctuation mark.
pub type Token = String;

/// A fixed-length embedding of one token.
pub type WordVector = Vec<f32>;

/// Sentinel token used as padding and as the decode stop signal.
pub const END_OF_LINE: &str = "EOL";

/// Vocabulary entry returned for words the table has never seen.
pub const UNKNOWN: &str = "UNK";

/// The result of decoding one line matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLine {
    /// Decoded words joined with a single space
    pub text: String,

    /// False when no row decoded to the end-of-line marker,
    /// i.e. every row of the matrix was treated as content
    pub terminated: bool,
}

/// Shape of a conversation tensor: [lines, words_in_sentence, dimension].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShape {
    pub lines:             usize,
    pub words_in_sentence: usize,
    pub dimension:         usize,
}

impl TensorShape {
    pub fn new(lines: usize, words_in_sentence: usize, dimension: usize) -> Self {
        Self { lines, words_in_sentence, dimension }
    }

    /// Number of matrix rows once the tensor is flattened to 2D.
    /// None when the product does not fit in a usize.
    pub fn rows(&self) -> Option<usize> {
        self.lines.checked_mul(self.words_in_sentence)
    }

    /// Total number of values, None on overflow.
    pub fn element_count(&self) -> Option<usize> {
        self.rows()?.checked_mul(self.dimension)
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.lines, self.words_in_sentence, self.dimension]
    }
}

impl From<[usize; 3]> for TensorShape {
    fn from([lines, words_in_sentence, dimension]: [usize; 3]) -> Self {
        Self::new(lines, words_in_sentence, dimension)
    }
}

impl std::fmt::Display for TensorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.lines, self.words_in_sentence, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rows() {
        let shape = TensorShape::new(3, 10, 50);
        assert_eq!(shape.rows(), Some(30));
        assert_eq!(shape.element_count(), Some(1500));
        assert_eq!(shape.dims(), [3, 10, 50]);
    }

    #[test]
    fn test_shape_overflow_is_none() {
        let shape = TensorShape::new(usize::MAX, 2, 2);
        assert_eq!(shape.rows(), None);
        assert_eq!(shape.element_count(), None);

        let wide = TensorShape::new(1, usize::MAX, 2);
        assert_eq!(wide.rows(), Some(usize::MAX));
        assert_eq!(wide.element_count(), None);
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(TensorShape::from([1, 2, 3]).to_string(), "[1, 2, 3]");
    }
}
