//! Sukhotin's Algorithm
//!
//! Unsupervised vowel identification from letter adjacency alone: vowels
//! tend to sit between consonants, so the letter with the most neighbours
//! is taken as a vowel, its neighbours are penalised, and the process
//! repeats for a fixed number of rounds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::{Error, Result};

pub const ALPHABET_SIZE: usize = 26;

/// Rounds of greedy vowel selection
pub const VOWEL_ROUNDS: usize = 5;

fn letter_index(c: char) -> Option<usize> {
    c.is_ascii_alphabetic()
        .then(|| (c.to_ascii_uppercase() as u8 - b'A') as usize)
}

fn index_letter(index: usize) -> char {
    (b'a' + index as u8) as char
}

/// Symmetric 26×26 count of adjacent letter pairs, zero diagonal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    counts: [[u32; ALPHABET_SIZE]; ALPHABET_SIZE],
    present: [bool; ALPHABET_SIZE],
}

impl AdjacencyMatrix {
    /// Slide a (previous, current, next) window over `text` padded with a
    /// non-letter sentinel at both ends.
    pub fn from_text(text: &str) -> Self {
        let mut counts = [[0u32; ALPHABET_SIZE]; ALPHABET_SIZE];
        let mut present = [false; ALPHABET_SIZE];

        let symbols: Vec<Option<usize>> = std::iter::once(None)
            .chain(text.chars().map(letter_index))
            .chain(std::iter::once(None))
            .collect();

        for window in symbols.windows(3) {
            if let [previous, Some(current), next] = *window {
                present[current] = true;
                if let Some(previous) = previous {
                    counts[current][previous] += 1;
                }
                if let Some(next) = next {
                    counts[current][next] += 1;
                }
            }
        }

        for (i, row) in counts.iter_mut().enumerate() {
            row[i] = 0;
        }

        Self { counts, present }
    }

    /// Count for two letters, case-insensitive; 0 for non-letters
    pub fn get(&self, a: char, b: char) -> u32 {
        match (letter_index(a), letter_index(b)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn row_sums(&self) -> [i64; ALPHABET_SIZE] {
        let mut sums = [0i64; ALPHABET_SIZE];
        for (sum, row) in sums.iter_mut().zip(&self.counts) {
            *sum = row.iter().map(|&n| i64::from(n)).sum();
        }
        sums
    }

    /// Whether the letter occurs in the source text at all
    pub fn contains(&self, letter: char) -> bool {
        letter_index(letter).map_or(false, |i| self.present[i])
    }

    pub fn is_empty(&self) -> bool {
        !self.present.iter().any(|&p| p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterClass {
    Vowel,
    Consonant,
}

/// Vowel/consonant assignment plus the order vowels were picked in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterClassification {
    classes: Vec<LetterClass>,
    order: Vec<char>,
}

impl LetterClassification {
    /// Vowel guesses, most confident first
    pub fn vowels(&self) -> &[char] {
        &self.order
    }

    pub fn consonants(&self) -> Vec<char> {
        (0..ALPHABET_SIZE)
            .filter(|&i| self.classes[i] == LetterClass::Consonant)
            .map(index_letter)
            .collect()
    }

    pub fn class_of(&self, letter: char) -> Option<LetterClass> {
        letter_index(letter).map(|i| self.classes[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SukhotinClassifier {
    rounds: usize,
}

impl Default for SukhotinClassifier {
    fn default() -> Self {
        Self {
            rounds: VOWEL_ROUNDS,
        }
    }
}

impl SukhotinClassifier {
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.vowel_rounds)
    }

    /// Every unclassified letter of the alphabet is a candidate each round,
    /// absent ones included with a running sum of zero.
    pub fn classify(&self, text: &str) -> Result<LetterClassification> {
        let matrix = AdjacencyMatrix::from_text(text);
        if matrix.is_empty() {
            return Err(Error::MalformedInput("text contains no letters".into()));
        }

        let mut sums = matrix.row_sums();
        let mut classes = vec![LetterClass::Consonant; ALPHABET_SIZE];
        let mut order = Vec::with_capacity(self.rounds);

        for _ in 0..self.rounds {
            let winner = (0..ALPHABET_SIZE)
                .filter(|&i| classes[i] == LetterClass::Consonant)
                // ties go to the alphabetically earliest letter
                .max_by(|&a, &b| sums[a].cmp(&sums[b]).then(b.cmp(&a)));
            let Some(winner) = winner else { break };

            debug!(letter = %index_letter(winner), sum = sums[winner], "vowel selected");
            classes[winner] = LetterClass::Vowel;
            order.push(index_letter(winner));

            for i in 0..ALPHABET_SIZE {
                if classes[i] == LetterClass::Consonant {
                    sums[i] -= 2 * i64::from(matrix.counts[i][winner]);
                }
            }
        }

        Ok(LetterClassification { classes, order })
    }
}

/// Top vowel guesses for `text` with the default number of rounds
pub fn vowel_guesses(text: &str) -> Result<Vec<char>> {
    SukhotinClassifier::default()
        .classify(text)
        .map(|c| c.vowels().to_vec())
}
