//! Key length estimation
//!
//! For each candidate length L, compare the blocks `[0, 2L)` and `[2L, 4L)`
//! bit by bit. Blocks aligned on the key phase cancel the key under XOR and
//! leave only plaintext-vs-plaintext differences, so the true length (and
//! its multiples) tends to the lowest normalized distance.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::xor::hamming_distance;
use crate::{Error, Result};

pub const MIN_KEY_LENGTH: usize = 2;
pub const MAX_KEY_LENGTH: usize = 39;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLengthCandidate {
    /// Hamming distance divided by the block length `2L`
    pub distance: f64,
    pub key_length: usize,
}

/// Candidates sorted ascending by distance, ties by shorter length
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyLengthRanking {
    candidates: Vec<KeyLengthCandidate>,
}

impl KeyLengthRanking {
    fn from_unsorted(mut candidates: Vec<KeyLengthCandidate>) -> Self {
        candidates.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.key_length.cmp(&b.key_length))
        });
        Self { candidates }
    }

    pub fn candidates(&self) -> &[KeyLengthCandidate] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyLengthCandidate> {
        self.candidates.iter()
    }

    /// Key lengths, most probable first
    pub fn key_lengths(&self) -> Vec<usize> {
        self.candidates.iter().map(|c| c.key_length).collect()
    }

    pub fn best(&self) -> Option<&KeyLengthCandidate> {
        self.candidates.first()
    }

    pub fn top(&self, n: usize) -> &[KeyLengthCandidate] {
        &self.candidates[..n.min(self.candidates.len())]
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLengthEstimator {
    min_len: usize,
    max_len: usize,
}

impl Default for KeyLengthEstimator {
    fn default() -> Self {
        Self {
            min_len: MIN_KEY_LENGTH,
            max_len: MAX_KEY_LENGTH,
        }
    }
}

impl KeyLengthEstimator {
    /// Search the inclusive range `min_len..=max_len`
    pub fn new(min_len: usize, max_len: usize) -> Result<Self> {
        if min_len == 0 || min_len > max_len {
            return Err(Error::MalformedInput(format!(
                "invalid key length range {}..={}",
                min_len, max_len
            )));
        }
        Ok(Self { min_len, max_len })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(config.min_key_length, config.max_key_length)
    }

    pub fn range(&self) -> std::ops::RangeInclusive<usize> {
        self.min_len..=self.max_len
    }

    /// Bytes `rank` needs: two `2L` blocks for the longest length
    pub fn required_prefix(&self) -> usize {
        4 * self.max_len
    }

    /// Rank every length of the range; the result is a total order over it.
    ///
    /// A prefix too short for the longest length is rejected rather than
    /// ranked on a narrower range.
    pub fn rank(&self, prefix: &[u8]) -> Result<KeyLengthRanking> {
        let needed = self.required_prefix();
        if prefix.len() < needed {
            return Err(Error::MalformedInput(format!(
                "key length estimation needs at least {} bytes, got {}",
                needed,
                prefix.len()
            )));
        }

        let candidates = self
            .range()
            .map(|len| {
                let block = 2 * len;
                let distance = hamming_distance(&prefix[..block], &prefix[block..2 * block])?;
                Ok(KeyLengthCandidate {
                    distance: f64::from(distance) / block as f64,
                    key_length: len,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(KeyLengthRanking::from_unsorted(candidates))
    }
}
