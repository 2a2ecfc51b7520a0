//! Word-shape patterns
//!
//! A word's pattern records its letter-repetition structure: the first
//! distinct letter becomes `A`, the second `B`, and so on ("aardvark" →
//! "AABCDABE"). Cipher words under a monoalphabetic substitution keep the
//! pattern of their plaintext, so the index narrows candidates to the
//! dictionary words of the same shape.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Distinct letters a pattern can name
pub const PATTERN_SYMBOLS: usize = 26;

/// Trailing marker flagging uncountable-plural entries in word lists
pub const UNCOUNTABLE_MARKER: char = '%';

/// Canonical shape of `word`.
///
/// Letters are compared case-insensitively; non-letters are kept verbatim.
pub fn pattern_of(word: &str) -> Result<String> {
    let mut seen: Vec<char> = Vec::with_capacity(PATTERN_SYMBOLS);

    word.to_lowercase()
        .chars()
        .map(|c| {
            if !c.is_alphabetic() {
                return Ok(c);
            }
            let index = match seen.iter().position(|&s| s == c) {
                Some(index) => index,
                None if seen.len() == PATTERN_SYMBOLS => {
                    return Err(Error::MalformedInput(format!(
                        "'{}' has more than {} distinct letters",
                        word, PATTERN_SYMBOLS
                    )))
                }
                None => {
                    seen.push(c);
                    seen.len() - 1
                }
            };
            Ok((b'A' + index as u8) as char)
        })
        .collect()
}

/// Keep the words whose char at each 0-based position equals the given one.
///
/// Comparison is ASCII case-insensitive; a position past the end of a
/// word never matches. Constraints narrow the list one after another.
pub fn filter_by_constraints<S: AsRef<str>>(words: &[S], constraints: &[(usize, char)]) -> Vec<String> {
    let all: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();

    constraints.iter().fold(all, |remaining, &(position, expected)| {
        remaining
            .into_iter()
            .filter(|word| {
                word.chars()
                    .nth(position)
                    .map_or(false, |c| c.eq_ignore_ascii_case(&expected))
            })
            .collect()
    })
}

/// Pattern → dictionary words sharing it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PatternBuckets")]
pub struct PatternIndex {
    patterns: HashMap<String, Vec<String>>,
    /// Every indexed word, for duplicate checks
    #[serde(skip)]
    words: HashSet<String>,
}

#[derive(Deserialize)]
struct PatternBuckets {
    patterns: HashMap<String, Vec<String>>,
}

impl From<PatternBuckets> for PatternIndex {
    fn from(buckets: PatternBuckets) -> Self {
        let words = buckets.patterns.values().flatten().cloned().collect();
        Self {
            patterns: buckets.patterns,
            words,
        }
    }
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a word list, skipping blanks and marked entries
    pub fn from_words<I, S>(words: I, uncountable_marker: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        let mut skipped = 0usize;

        for raw in words {
            let word = raw.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if word.ends_with(uncountable_marker) {
                skipped += 1;
                continue;
            }
            if let Err(e) = index.insert(word) {
                warn!(word, error = %e, "skipping dictionary entry");
                skipped += 1;
            }
        }

        debug!(
            patterns = index.pattern_count(),
            words = index.word_count(),
            skipped,
            "pattern index built"
        );
        index
    }

    /// Add a word; returns false when it was already indexed
    pub fn insert(&mut self, word: &str) -> Result<bool> {
        let pattern = pattern_of(word)?;
        if !self.words.insert(word.to_string()) {
            return Ok(false);
        }
        self.patterns.entry(pattern).or_default().push(word.to_string());
        Ok(true)
    }

    /// Words of the given pattern; empty when the pattern is unknown
    pub fn words_for(&self, pattern: &str) -> &[String] {
        self.patterns.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dictionary words with the same shape as a cipher word
    pub fn candidates_for(&self, cipher_word: &str) -> Result<&[String]> {
        Ok(self.words_for(&pattern_of(cipher_word)?))
    }

    /// Candidates for a cipher word narrowed by known plaintext letters
    pub fn matching(&self, cipher_word: &str, constraints: &[(usize, char)]) -> Result<Vec<String>> {
        let candidates = self.candidates_for(cipher_word)?;
        Ok(filter_by_constraints(candidates, constraints))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
