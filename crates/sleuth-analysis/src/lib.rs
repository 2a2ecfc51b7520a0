//! Sleuth: Classical/XOR Cryptanalysis Engine
//!
//! Statistical attacks that recover plaintext and key material from
//! ciphertext by exploiting the redundancy of English text. Every search
//! returns the best-scoring hypothesis; results are probabilistic.
//!
//! # Modules
//! - `scorer` - English-likeness score, the objective of every search
//! - `xor` - Fixed XOR, repeating-key XOR, bit-level Hamming distance
//! - `single_byte` - Single-byte XOR brute force and line detection
//! - `key_length` - Key length ranking by normalized Hamming distance
//! - `repeating_key` - Repeating-key XOR breaker (column split + reassembly)
//! - `sukhotin` - Sukhotin's vowel/consonant partitioning
//! - `pattern` - Word-shape patterns and the pattern → words index
//! - `store` - On-disk cache for the pattern index
//! - `ecb` - Repeated-block detection for ECB ciphertexts
//! - `frequency` - Cryptogram letter statistics
//! - `config` - Tunable constants

pub mod config;
pub mod ecb;
pub mod frequency;
pub mod key_length;
pub mod pattern;
pub mod repeating_key;
pub mod scorer;
pub mod single_byte;
pub mod store;
pub mod sukhotin;
pub mod xor;

pub use config::AnalysisConfig;
pub use ecb::{EcbDetection, EcbDetector, RepeatedBlock};
pub use frequency::FrequencyAnalysis;
pub use key_length::{KeyLengthCandidate, KeyLengthEstimator, KeyLengthRanking};
pub use pattern::{filter_by_constraints, pattern_of, PatternIndex};
pub use repeating_key::{AcceptancePolicy, BrokenXor, RepeatingKeyXorBreaker};
pub use scorer::EnglishScorer;
pub use single_byte::{Detection, SingleByteXorSolver};
pub use store::PatternIndexStore;
pub use sukhotin::{AdjacencyMatrix, LetterClass, LetterClassification, SukhotinClassifier};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient confidence: best score {:.3} is below the required {:.3}", .best.score, .required)]
    InsufficientConfidence { best: ScoredCandidate, required: f64 },

    #[error("Key length undetermined: none of {tried} candidate lengths cleared {threshold}")]
    UndeterminedKeyLength { tried: usize, threshold: f64 },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Length mismatch: {left} bytes vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A decoded hypothesis produced by a single-byte search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Decoded text, one char per byte (Latin-1 code points)
    pub plaintext: String,
    pub key: u8,
    /// English-likeness in [0, 1]
    pub score: f64,
}

impl ScoredCandidate {
    /// Key rendered as a char, for display
    pub fn key_char(&self) -> char {
        self.key as char
    }
}
