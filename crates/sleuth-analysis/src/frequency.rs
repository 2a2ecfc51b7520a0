//! Cryptogram Frequency Analysis
//!
//! Letter counts, doubled letters, Index of Coincidence and the English
//! reference tables used to read them.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WORD_PATTERN: Regex = Regex::new(r"[A-Za-z']+").unwrap();
}

/// Overall frequency of letters in English (%)
pub const ENGLISH_LETTER_FREQUENCIES: [(char, f64); 26] = [
    ('a', 8.2), ('b', 1.5), ('c', 2.8), ('d', 4.3), ('e', 12.7), ('f', 2.2),
    ('g', 2.0), ('h', 6.1), ('i', 7.0), ('j', 0.2), ('k', 0.8), ('l', 4.0),
    ('m', 2.4), ('n', 6.7), ('o', 7.5), ('p', 1.9), ('q', 0.1), ('r', 6.0),
    ('s', 6.3), ('t', 9.0), ('u', 2.8), ('v', 1.0), ('w', 2.4), ('x', 0.2),
    ('y', 2.0), ('z', 0.1),
];

/// Most common doubled letters per 1000 words
pub const COMMON_DOUBLES: [(&str, f64); 15] = [
    ("ll", 19.0), ("ss", 15.0), ("ee", 14.0), ("oo", 12.0), ("tt", 9.0),
    ("ff", 9.0), ("rr", 6.0), ("nn", 5.0), ("pp", 4.5), ("cc", 4.0),
    ("mm", 4.0), ("gg", 4.0), ("dd", 1.5), ("aa", 0.5), ("bb", 0.25),
];

/// Two identical letters side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubledLetter {
    pub letter: char,
    /// Char offset of the first of the pair in the analysed text
    pub position: usize,
}

/// Frequency analysis for cryptograms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyAnalysis {
    pub frequencies: HashMap<char, usize>,
    pub total_letters: usize,
    pub doubles: Vec<DoubledLetter>,
}

impl FrequencyAnalysis {
    /// Analyze text; letters are folded to upper case
    pub fn analyze(text: &str) -> Self {
        let mut frequencies: HashMap<char, usize> = HashMap::new();
        let mut doubles = Vec::new();
        let mut total_letters = 0;
        let mut previous: Option<char> = None;

        for (position, c) in text.chars().enumerate() {
            if !c.is_ascii_alphabetic() {
                previous = None;
                continue;
            }
            let c = c.to_ascii_uppercase();
            *frequencies.entry(c).or_insert(0) += 1;
            total_letters += 1;

            if previous == Some(c) {
                doubles.push(DoubledLetter {
                    letter: c,
                    position: position - 1,
                });
            }
            previous = Some(c);
        }

        Self {
            frequencies,
            total_letters,
            doubles,
        }
    }

    pub fn count(&self, c: char) -> usize {
        *self.frequencies.get(&c.to_ascii_uppercase()).unwrap_or(&0)
    }

    /// Get frequency as percentage
    pub fn frequency_percent(&self, c: char) -> f64 {
        if self.total_letters > 0 {
            (self.count(c) as f64 / self.total_letters as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Top N letters by count; equal counts list the later letter first
    pub fn top_letters(&self, n: usize) -> Vec<(char, usize)> {
        let mut sorted: Vec<_> = self.frequencies.iter().map(|(&c, &n)| (c, n)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        sorted.truncate(n);
        sorted
    }

    /// Calculate Index of Coincidence
    /// English text ≈ 0.067, random ≈ 0.038
    pub fn index_of_coincidence(&self) -> f64 {
        if self.total_letters < 2 {
            return 0.0;
        }

        let sum: usize = self.frequencies.values().map(|&n| n * (n - 1)).sum();
        let n = self.total_letters;
        sum as f64 / (n * (n - 1)) as f64
    }

    /// Chi-squared distance from English letter frequencies
    pub fn chi_squared_english(&self) -> f64 {
        if self.total_letters == 0 {
            return 0.0;
        }

        ENGLISH_LETTER_FREQUENCIES
            .iter()
            .map(|&(c, percent)| {
                let expected = percent / 100.0;
                let observed = self.count(c) as f64 / self.total_letters as f64;
                (observed - expected).powi(2) / expected
            })
            .sum()
    }

    /// Words of letters and apostrophes, in order
    pub fn words(text: &str) -> Vec<&str> {
        WORD_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Letter table, most frequent first, beside the English reference
    pub fn render_ascii(&self) -> String {
        let mut lines = Vec::new();
        lines.push("FREQUENCY ANALYSIS".to_string());
        lines.push("═".repeat(40));

        let max_count = self.frequencies.values().copied().max().unwrap_or(1);
        let scale = 30.0 / max_count as f64;

        for (c, count) in self.top_letters(ENGLISH_LETTER_FREQUENCIES.len()) {
            let english = ENGLISH_LETTER_FREQUENCIES
                .iter()
                .find(|(e, _)| e.eq_ignore_ascii_case(&c))
                .map_or(0.0, |&(_, p)| p);
            let bar = "█".repeat((count as f64 * scale) as usize);
            lines.push(format!(
                "{}: {:5.2}% (en {:5.2}%) |{}",
                c,
                self.frequency_percent(c),
                english,
                bar
            ));
        }

        lines.push(String::new());
        lines.push(format!("Letters: {}", self.total_letters));
        lines.push(format!("Index of Coincidence: {:.4}", self.index_of_coincidence()));
        lines.push(format!("Chi-squared (English): {:.4}", self.chi_squared_english()));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_analysis() {
        let analysis = FrequencyAnalysis::analyze("HELLO WORLD");
        assert_eq!(analysis.total_letters, 10);
        assert_eq!(analysis.count('l'), 3);
        assert!((analysis.frequency_percent('L') - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_doubles() {
        let analysis = FrequencyAnalysis::analyze("Ball a-a ssee");
        let found: Vec<(char, usize)> = analysis.doubles.iter().map(|d| (d.letter, d.position)).collect();
        // "a-a" is not a double: the hyphen separates them
        assert_eq!(found, vec![('L', 2), ('S', 9), ('E', 11)]);
    }

    #[test]
    fn test_top_letters() {
        let analysis = FrequencyAnalysis::analyze("AAABBCDD");
        let top = analysis.top_letters(3);
        assert_eq!(top, vec![('A', 3), ('D', 2), ('B', 2)]);
    }

    #[test]
    fn test_substitution_keeps_english_ioc() {
        // monoalphabetic cryptogram: letters are relabelled, counts are not
        let cryptogram = "tpfccdlfdtte pcaccplircdt dklpcfrp?qeiq lhpqlipqeodf \
                          gpwafopwprti izxndkiqpkii krirrifcapnc dxkdciqcafmd vkfpcadf.";
        let analysis = FrequencyAnalysis::analyze(cryptogram);
        assert_eq!(analysis.total_letters, 104);
        assert_eq!(analysis.top_letters(1), vec![('P', 13)]);

        let ioc = analysis.index_of_coincidence();
        assert!(ioc > 0.06 && ioc < 0.075, "IoC was {}", ioc);
        assert!(FrequencyAnalysis::analyze("qzxj vkwb").index_of_coincidence() < 0.01);
    }

    #[test]
    fn test_words() {
        assert_eq!(
            FrequencyAnalysis::words("tpfcc dlf? it's, qeiq."),
            vec!["tpfcc", "dlf", "it's", "qeiq"]
        );
    }

    #[test]
    fn test_render_lists_present_letters() {
        let rendered = FrequencyAnalysis::analyze("eee t").render_ascii();
        let rows: Vec<&str> = rendered.lines().skip(2).take(2).collect();
        assert!(rows[0].starts_with("E: 75.00% (en 12.70%)"));
        assert!(rows[1].starts_with("T: 25.00%"));
        assert!(rendered.contains("Letters: 4"));
    }

    #[test]
    fn test_reference_tables() {
        let total: f64 = ENGLISH_LETTER_FREQUENCIES.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1.0);
        assert_eq!(COMMON_DOUBLES[0].0, "ll");
    }
}
