//! English-likeness scoring
//!
//! Fraction of characters that look like English prose. Runs 256 times
//! per column during XOR key searches.

/// Punctuation accepted alongside ASCII letters and space.
pub const ENGLISH_PUNCTUATION: [char; 7] = [',', ';', ':', '?', '!', '\'', '"'];

pub struct EnglishScorer;

impl EnglishScorer {
    /// ASCII letter, space, or one of [`ENGLISH_PUNCTUATION`]
    pub fn is_english_char(c: char) -> bool {
        c.is_ascii_alphabetic() || c == ' ' || ENGLISH_PUNCTUATION.contains(&c)
    }

    /// Score a text in [0, 1]. Empty text scores 0.
    pub fn score(text: &str) -> f64 {
        let (hits, total) = text.chars().fold((0usize, 0usize), |(hits, total), c| {
            (hits + usize::from(Self::is_english_char(c)), total + 1)
        });
        ratio(hits, total)
    }

    /// Score raw bytes, each read as the char with the same code point.
    ///
    /// Equal to `score` of the Latin-1 decoding of `bytes`, without
    /// allocating the string.
    pub fn score_bytes(bytes: &[u8]) -> f64 {
        let hits = bytes
            .iter()
            .filter(|&&b| Self::is_english_char(b as char))
            .count();
        ratio(hits, bytes.len())
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
