//! Repeating-key XOR breaker
//!
//! Pipeline: rank key lengths on a prefix, accept the first length whose
//! sampled column decodes as English, then solve every column as its own
//! single-byte XOR and interleave the columns back into the plaintext.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::key_length::KeyLengthEstimator;
use crate::single_byte::SingleByteXorSolver;
use crate::xor::latin1_string;
use crate::{Error, Result, ScoredCandidate};

/// Column-0 score a key length must exceed to be accepted.
///
/// Tuned empirically on English text; not a structural invariant.
pub const KEY_LENGTH_ACCEPTANCE: f64 = 0.91;

/// Bytes of ciphertext handed to the key length estimator
pub const KEY_LENGTH_SAMPLE: usize = 240;

/// How a candidate key length is judged before committing to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Score of column 0 only
    #[default]
    FirstColumn,
    /// Mean score of the first `columns` columns.
    ///
    /// Guards against an unlucky low-entropy first column, at the price of
    /// extra solves per candidate.
    SampledColumns { columns: usize },
}

/// Recovered key and plaintext
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokenXor {
    pub plaintext: String,
    pub key: Vec<u8>,
    pub key_length: usize,
    /// Per-column solutions, in key order
    pub columns: Vec<ScoredCandidate>,
}

impl BrokenXor {
    pub fn key_text(&self) -> String {
        latin1_string(&self.key)
    }

    /// Lowest column score, a rough confidence for the whole key
    pub fn min_score(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.score)
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone)]
pub struct RepeatingKeyXorBreaker {
    estimator: KeyLengthEstimator,
    sample_len: usize,
    threshold: f64,
    acceptance: AcceptancePolicy,
}

impl Default for RepeatingKeyXorBreaker {
    fn default() -> Self {
        Self {
            estimator: KeyLengthEstimator::default(),
            sample_len: KEY_LENGTH_SAMPLE,
            threshold: KEY_LENGTH_ACCEPTANCE,
            acceptance: AcceptancePolicy::FirstColumn,
        }
    }
}

impl RepeatingKeyXorBreaker {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator: KeyLengthEstimator::from_config(config)?,
            sample_len: config.key_length_sample,
            threshold: config.key_length_acceptance,
            acceptance: config.acceptance,
        })
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Recover the key and plaintext of a repeating-key XOR ciphertext.
    ///
    /// The ciphertext must cover two blocks of twice the longest key length.
    pub fn break_xor(&self, ciphertext: &[u8]) -> Result<BrokenXor> {
        if ciphertext.is_empty() {
            return Err(Error::MalformedInput("cannot break an empty ciphertext".into()));
        }

        let prefix = &ciphertext[..ciphertext.len().min(self.sample_len)];
        let ranking = self.estimator.rank(prefix)?;

        let mut tried = 0;
        for candidate in ranking.iter() {
            tried += 1;
            let key_length = candidate.key_length;
            let columns = split_columns(ciphertext, key_length);
            let score = self.acceptance_score(&columns)?;
            debug!(key_length, distance = candidate.distance, score, "trying key length");

            if score > self.threshold {
                info!(key_length, score, "accepted key length");
                return solve_columns(key_length, &columns);
            }
        }

        Err(Error::UndeterminedKeyLength {
            tried,
            threshold: self.threshold,
        })
    }

    fn acceptance_score(&self, columns: &[Vec<u8>]) -> Result<f64> {
        match self.acceptance {
            AcceptancePolicy::FirstColumn => Ok(SingleByteXorSolver::solve(&columns[0])?.score),
            AcceptancePolicy::SampledColumns { columns: wanted } => {
                let sampled = &columns[..wanted.clamp(1, columns.len())];
                let total = sampled
                    .iter()
                    .map(|column| SingleByteXorSolver::solve(column).map(|c| c.score))
                    .sum::<Result<f64>>()?;
                Ok(total / sampled.len() as f64)
            }
        }
    }
}

fn solve_columns(key_length: usize, columns: &[Vec<u8>]) -> Result<BrokenXor> {
    let solved = columns
        .iter()
        .map(|column| SingleByteXorSolver::solve(column))
        .collect::<Result<Vec<_>>>()?;

    Ok(BrokenXor {
        plaintext: interleave(&solved),
        key: solved.iter().map(|c| c.key).collect(),
        key_length,
        columns: solved,
    })
}

/// Byte at position `p` goes to column `p % key_length`
pub fn split_columns(data: &[u8], key_length: usize) -> Vec<Vec<u8>> {
    (0..key_length)
        .map(|column| data.iter().skip(column).step_by(key_length).copied().collect())
        .collect()
}

/// Round-robin the column plaintexts back into position order.
///
/// Trailing columns may be one char shorter than the leading ones.
pub fn interleave(columns: &[ScoredCandidate]) -> String {
    let chars: Vec<Vec<char>> = columns.iter().map(|c| c.plaintext.chars().collect()).collect();
    let rows = chars.first().map_or(0, Vec::len);

    (0..rows)
        .flat_map(|row| chars.iter().filter_map(move |column| column.get(row).copied()))
        .collect()
}
