//! Single-byte XOR solver
//!
//! Brute-forces all 256 keys against the English scorer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scorer::EnglishScorer;
use crate::xor::{latin1_string, xor_with_byte};
use crate::{Error, Result, ScoredCandidate};

/// Minimum score a caller should demand before trusting a solution.
///
/// Tuned empirically on English text; not a structural invariant.
pub const MIN_CONFIDENCE: f64 = 0.95;

/// A line flagged by [`SingleByteXorSolver::detect`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Zero-based index of the line in the input
    pub line: usize,
    pub candidate: ScoredCandidate,
}

pub struct SingleByteXorSolver;

impl SingleByteXorSolver {
    /// Decode and score `ciphertext` under one key
    pub fn candidate(ciphertext: &[u8], key: u8) -> ScoredCandidate {
        let decoded = xor_with_byte(ciphertext, key);
        ScoredCandidate {
            score: EnglishScorer::score_bytes(&decoded),
            plaintext: latin1_string(&decoded),
            key,
        }
    }

    /// Best-scoring key over [0, 256). Ties keep the lowest key.
    pub fn solve(ciphertext: &[u8]) -> Result<ScoredCandidate> {
        if ciphertext.is_empty() {
            return Err(Error::MalformedInput("cannot solve an empty ciphertext".into()));
        }

        let (key, _) = (0..=u8::MAX)
            .map(|key| (key, EnglishScorer::score_bytes(&xor_with_byte(ciphertext, key))))
            .fold((0u8, f64::NEG_INFINITY), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            });

        Ok(Self::candidate(ciphertext, key))
    }

    /// Like [`solve`](Self::solve), but fails when the best score is below `min_score`
    pub fn solve_with_min_score(ciphertext: &[u8], min_score: f64) -> Result<ScoredCandidate> {
        let best = Self::solve(ciphertext)?;
        if best.score < min_score {
            return Err(Error::InsufficientConfidence {
                best,
                required: min_score,
            });
        }
        Ok(best)
    }

    /// Find the lines that look single-byte XOR encrypted.
    ///
    /// Every non-empty line is solved; those scoring strictly above
    /// `threshold` are returned in input order.
    pub fn detect<T: AsRef<[u8]>>(lines: &[T], threshold: f64) -> Vec<Detection> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.as_ref().is_empty())
            .filter_map(|(index, line)| {
                let candidate = Self::solve(line.as_ref()).ok()?;
                debug!(line = index, key = candidate.key, score = candidate.score, "scored line");
                (candidate.score > threshold).then_some(Detection {
                    line: index,
                    candidate,
                })
            })
            .collect()
    }
}
