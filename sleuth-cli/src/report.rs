//! Terminal rendering shared by the commands

use sleuth_analysis::frequency::COMMON_DOUBLES;
use sleuth_analysis::{BrokenXor, FrequencyAnalysis, ScoredCandidate};

const PREVIEW_WIDTH: usize = 72;

pub fn header(title: &str) {
    println!("\n  {}", title);
    println!("  {}\n", "=".repeat(title.chars().count()));
}

/// First `width` chars with control chars masked, for one-line display
pub fn preview(text: &str, width: usize) -> String {
    let shown: String = text
        .chars()
        .take(width)
        .map(|c| if c.is_control() { '.' } else { c })
        .collect();
    if text.chars().count() > width {
        format!("{}...", shown)
    } else {
        shown
    }
}

pub fn candidate(candidate: &ScoredCandidate) {
    println!("  Key:       0x{:02x} ({:?})", candidate.key, candidate.key_char());
    println!("  Score:     {:.3}", candidate.score);
    println!("  Plaintext: {}", preview(&candidate.plaintext, PREVIEW_WIDTH));
}

pub fn broken_xor(broken: &BrokenXor) {
    println!("  Key length: {}", broken.key_length);
    println!("  Key:        {:?}", broken.key_text());
    println!("  Key (hex):  {}", hex::encode(&broken.key));
    println!("  Min column score: {:.3}\n", broken.min_score());
    println!("  PLAINTEXT:");
    for line in broken.plaintext.lines() {
        println!("  {}", line);
    }
}

pub fn frequency(analysis: &FrequencyAnalysis) {
    for line in analysis.render_ascii().lines() {
        println!("  {}", line);
    }

    if analysis.doubles.is_empty() {
        return;
    }

    println!("\n  DOUBLED LETTERS:");
    let mut seen: Vec<char> = Vec::new();
    for double in &analysis.doubles {
        if !seen.contains(&double.letter) {
            seen.push(double.letter);
        }
    }
    for letter in seen {
        let count = analysis.doubles.iter().filter(|d| d.letter == letter).count();
        println!("  {}{}  x{}", letter, letter, count);
    }

    println!("\n  COMMON IN ENGLISH (per 1000 words):");
    let common: Vec<String> = COMMON_DOUBLES
        .iter()
        .map(|(pair, rate)| format!("{} {}", pair, rate))
        .collect();
    println!("  {}", common.join(", "));
}
