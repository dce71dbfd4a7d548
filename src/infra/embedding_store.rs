// ============================================================
// Layer 6 — Embedding Store
// ============================================================
// An in-memory word-vector table that implements the
// WordVectorCodec capability.
//
// A table can come from three places:
//   1. built from a corpus: every distinct token gets a vector
//      drawn from a seeded RNG (same corpus + seed → same table)
//   2. loaded from a word2vec / GloVe style text file:
//        [count dim]            ← optional header
//        word v1 v2 ... vD
//   3. loaded from the JSON file written by save_json()
//
// Two entries are always present and always come first:
//   "EOL": padding and end-of-line stop signal
//   "UNK": fallback vector for out-of-vocabulary words
//
// Reverse lookup picks the entry with the highest cosine
// similarity; ties go to the earlier entry. An all-zero vector
// is similar to nothing, so it decodes to the first entry (EOL).

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

use crate::data::normalizer::TextNormalizer;
use crate::domain::error::CodecError;
use crate::domain::token::{WordVector, END_OF_LINE, UNKNOWN};
use crate::domain::traits::{WordLookup, WordVectorCodec};

/// Seed for the reserved vectors when a loaded table lacks them
const RESERVED_SEED: u64 = 0x5EED_E01;

/// On-disk JSON layout
#[derive(Serialize, Deserialize)]
struct TableFile {
    dimension: usize,
    words:     Vec<String>,
    vectors:   Vec<WordVector>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dimension: usize,
    words:     Vec<String>,
    vectors:   Vec<WordVector>,
    index:     HashMap<String, usize>,
}

impl EmbeddingTable {
    /// Build a table from explicit (word, vector) entries.
    ///
    /// Duplicate words keep their first vector. EOL and UNK are
    /// added with seeded vectors when the entries don't supply them.
    pub fn new(dimension: usize, entries: Vec<(String, WordVector)>) -> Result<Self, CodecError> {
        if dimension == 0 {
            return Err(CodecError::InvalidDimension);
        }

        let mut rng   = StdRng::seed_from_u64(RESERVED_SEED);
        let mut table = Self {
            dimension,
            words:   Vec::with_capacity(entries.len() + 2),
            vectors: Vec::with_capacity(entries.len() + 2),
            index:   HashMap::with_capacity(entries.len() + 2),
        };

        let supplied: HashMap<&str, &WordVector> =
            entries.iter().map(|(w, v)| (w.as_str(), v)).collect();
        for reserved in [END_OF_LINE, UNKNOWN] {
            let vector = match supplied.get(reserved) {
                Some(v) => (*v).clone(),
                None    => random_vector(&mut rng, dimension),
            };
            table.push(reserved.to_string(), vector)?;
        }

        for (word, vector) in entries {
            if !table.index.contains_key(&word) {
                table.push(word, vector)?;
            }
        }
        Ok(table)
    }

    /// Build a table covering every token that appears in `texts`.
    ///
    /// Tokens are taken in first-seen order after normalisation,
    /// so the same corpus and seed always produce the same table.
    pub fn from_corpus(texts: &[String], dimension: usize, seed: u64) -> Result<Self, CodecError> {
        let normalizer = TextNormalizer::new();
        let mut rng    = StdRng::seed_from_u64(seed);
        let mut seen   = std::collections::HashSet::new();
        let mut entries = Vec::new();

        for text in texts {
            for token in normalizer.normalize(text)? {
                if seen.insert(token.clone()) {
                    entries.push((token, random_vector(&mut rng, dimension)));
                }
            }
        }

        let table = Self::new(dimension, entries)?;
        tracing::info!(
            "Built embedding table: {} words, dimension {}",
            table.len(),
            dimension
        );
        Ok(table)
    }

    /// Load a word2vec / GloVe style text file.
    pub fn load_text(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path    = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        let parse_err = |line: usize, message: String| CodecError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        let mut dimension: Option<usize> = None;
        let mut entries = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            // "count dim" header on the first line
            if i == 0 && fields.len() == 2 && fields.iter().all(|f| f.parse::<usize>().is_ok()) {
                dimension = fields[1].parse().ok();
                continue;
            }

            let vector = fields[1..]
                .iter()
                .map(|f| f.parse::<f32>())
                .collect::<Result<WordVector, _>>()
                .map_err(|e| parse_err(i + 1, e.to_string()))?;

            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected || expected == 0 {
                return Err(parse_err(
                    i + 1,
                    format!("expected {} values, found {}", expected, vector.len()),
                ));
            }
            entries.push((fields[0].to_string(), vector));
        }

        let dimension = dimension.ok_or(CodecError::EmptyVocabulary)?;
        let table     = Self::new(dimension, entries)?;
        tracing::info!("Loaded {} word vectors from '{}'", table.len(), path.display());
        Ok(table)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        let file = TableFile {
            dimension: self.dimension,
            words:     self.words.clone(),
            vectors:   self.vectors.clone(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CodecError::io(parent, e))?;
        }
        fs::write(path, serde_json::to_string(&file)?).map_err(|e| CodecError::io(path, e))?;
        tracing::debug!("Saved embedding table to '{}'", path.display());
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        let file: TableFile = serde_json::from_str(&json)?;
        if file.words.len() != file.vectors.len() {
            return Err(CodecError::Parse {
                path:    path.to_path_buf(),
                line:    1,
                message: format!("{} words but {} vectors", file.words.len(), file.vectors.len()),
            });
        }
        Self::new(file.dimension, file.words.into_iter().zip(file.vectors).collect())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn push(&mut self, word: String, vector: WordVector) -> Result<(), CodecError> {
        if vector.len() != self.dimension {
            return Err(CodecError::DimensionMismatch {
                expected: self.dimension,
                actual:   vector.len(),
            });
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
        Ok(())
    }

    fn unknown_vector(&self) -> &WordVector {
        // Reserved entries are inserted by every constructor
        &self.vectors[self.index[UNKNOWN]]
    }
}

impl WordVectorCodec for EmbeddingTable {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn word_to_vector(&self, word: &str) -> WordLookup {
        match self.index.get(word) {
            Some(&i) => WordLookup::Found(self.vectors[i].clone()),
            None     => WordLookup::Fallback(self.unknown_vector().clone()),
        }
    }

    fn vector_to_word(&self, vector: &[f32]) -> Result<String, CodecError> {
        if vector.len() != self.dimension {
            return Err(CodecError::DimensionMismatch {
                expected: self.dimension,
                actual:   vector.len(),
            });
        }
        if self.is_empty() {
            return Err(CodecError::EmptyVocabulary);
        }

        let mut best       = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for (i, candidate) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(vector, candidate);
            if score > best_score {
                best_score = score;
                best       = i;
            }
        }
        Ok(self.words[best].clone())
    }
}

fn random_vector(rng: &mut StdRng, dimension: usize) -> WordVector {
    (0..dimension).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Cosine similarity; zero-length vectors score 0 against everything.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32    = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
