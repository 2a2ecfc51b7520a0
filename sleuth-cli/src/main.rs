//! Sleuth CLI
//!
//! Classical and XOR cryptanalysis from the command line.

mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sleuth_analysis::xor::{fixed_xor, hamming_distance, latin1_string, repeating_key_xor};
use sleuth_analysis::{
    pattern_of, AcceptancePolicy, AnalysisConfig, EcbDetector, EnglishScorer, Error,
    FrequencyAnalysis, KeyLengthEstimator, PatternIndexStore, RepeatingKeyXorBreaker,
    SingleByteXorSolver, SukhotinClassifier,
};

#[derive(Parser)]
#[command(name = "sleuth")]
#[command(author, version, about = "Sleuth - classical and XOR cryptanalysis", long_about = None)]
struct Cli {
    /// Analysis config (YAML). Defaults to <config dir>/sleuth/config.yaml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// English-likeness score of a text
    Score {
        text: String,
    },

    /// XOR two equal-length buffers
    Xor {
        left: String,
        right: String,

        #[arg(long, value_enum, default_value_t = Format::Hex)]
        format: Format,
    },

    /// Break single-byte XOR
    Solve {
        #[command(flatten)]
        input: Input,

        /// Minimum score to accept (default from config)
        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Find the single-byte XOR encrypted lines of a file
    Detect {
        #[command(flatten)]
        input: LinesInput,

        /// Score a line must exceed (default from config)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Bit-level Hamming distance
    Hamming {
        left: String,
        right: String,

        #[arg(long, value_enum, default_value_t = Format::Raw)]
        format: Format,
    },

    /// Encrypt with repeating-key XOR
    Encrypt {
        /// Key (raw text)
        #[arg(short, long)]
        key: String,

        #[command(flatten)]
        input: TextInput,

        /// Output encoding
        #[arg(long, value_enum, default_value_t = Format::Hex)]
        encoding: Format,
    },

    /// Rank likely repeating-key XOR key lengths
    KeyLength {
        #[command(flatten)]
        input: Input,

        /// Number of candidates to show
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,
    },

    /// Break repeating-key XOR
    Break {
        #[command(flatten)]
        input: Input,

        /// Judge key lengths on the mean of this many columns
        #[arg(long)]
        sampled_columns: Option<usize>,

        /// Write the result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find ECB-encrypted lines by repeated blocks
    Ecb {
        #[command(flatten)]
        input: LinesInput,

        /// Block size in bytes (default from config)
        #[arg(long)]
        block_size: Option<usize>,
    },

    /// Guess the vowels of a text with Sukhotin's algorithm
    Vowels {
        #[command(flatten)]
        input: TextInput,

        /// Number of vowels to pick (default from config)
        #[arg(long)]
        rounds: Option<usize>,
    },

    /// Show the letter-repetition pattern of words
    Pattern {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Dictionary words that could decrypt a cryptogram word
    Words {
        /// Cipher word
        word: String,

        /// Word list, one word per line
        #[arg(short, long)]
        dict: PathBuf,

        /// Known plaintext letter as POS=CHAR (0-based, repeatable)
        #[arg(short = 'c', long = "constraint", value_parser = parse_constraint)]
        constraints: Vec<(usize, char)>,

        /// Pattern index cache file
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Discard the cache and rebuild it from the word list
        #[arg(long)]
        rebuild: bool,
    },

    /// Letter frequencies, doubles and Index of Coincidence of a cryptogram
    Analyze {
        #[command(flatten)]
        input: TextInput,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Hex,
    Base64,
    Raw,
}

impl Format {
    fn decode(self, data: &str) -> Result<Vec<u8>> {
        let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(match self {
            Format::Hex => hex::decode(compact)?,
            Format::Base64 => BASE64.decode(compact)?,
            Format::Raw => data.as_bytes().to_vec(),
        })
    }

    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Format::Hex => hex::encode(bytes),
            Format::Base64 => BASE64.encode(bytes),
            Format::Raw => latin1_string(bytes),
        }
    }
}

/// Ciphertext given inline or read from a file
#[derive(Args)]
struct Input {
    /// Inline ciphertext
    text: Option<String>,

    /// Read the ciphertext from a file; hex and base64 lines are joined
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Input encoding
    #[arg(long, value_enum, default_value_t = Format::Hex)]
    format: Format,
}

impl Input {
    fn read(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.file) {
            (Some(text), _) => self.format.decode(text),
            (None, Some(path)) if self.format == Format::Raw => Ok(std::fs::read(path)?),
            (None, Some(path)) => self.format.decode(&std::fs::read_to_string(path)?),
            (None, None) => anyhow::bail!("No input: pass it inline or with --file"),
        }
    }
}

/// A file of independently encoded ciphertexts, one per line
#[derive(Args)]
struct LinesInput {
    file: PathBuf,

    /// Line encoding
    #[arg(long, value_enum, default_value_t = Format::Hex)]
    format: Format,
}

impl LinesInput {
    fn read(&self) -> Result<Vec<Vec<u8>>> {
        let content = std::fs::read_to_string(&self.file)?;
        content
            .lines()
            .map(|line| self.format.decode(line.trim_end_matches('\r')))
            .collect()
    }
}

/// Plain text given inline or read from a file
#[derive(Args)]
struct TextInput {
    text: Option<String>,

    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

impl TextInput {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            (None, None) => anyhow::bail!("No input: pass it inline or with --file"),
        }
    }
}

fn parse_constraint(s: &str) -> std::result::Result<(usize, char), String> {
    let (position, letter) = s
        .split_once('=')
        .ok_or_else(|| format!("expected POS=CHAR, got '{}'", s))?;
    let position = position
        .trim()
        .parse()
        .map_err(|e| format!("bad position '{}': {}", position, e))?;
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((position, c)),
        _ => Err(format!("expected a single char after '=', got '{}'", letter)),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sleuth=debug,sleuth_analysis=debug"
    } else {
        "sleuth=info,sleuth_analysis=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => AnalysisConfig::from_yaml_file(path)?,
        None => AnalysisConfig::load_default()?,
    };
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Score { text } => cmd_score(&text),
        Commands::Xor { left, right, format } => cmd_xor(&left, &right, format),
        Commands::Solve { input, min_score } => cmd_solve(&input, min_score.unwrap_or(config.min_confidence)),
        Commands::Detect { input, threshold } => cmd_detect(&input, threshold.unwrap_or(config.min_confidence)),
        Commands::Hamming { left, right, format } => cmd_hamming(&left, &right, format),
        Commands::Encrypt { key, input, encoding } => cmd_encrypt(&key, &input, encoding),
        Commands::KeyLength { input, top } => cmd_key_length(&input, top, &config),
        Commands::Break { input, sampled_columns, output } => {
            cmd_break(&input, sampled_columns, output.as_deref(), config)
        }
        Commands::Ecb { input, block_size } => cmd_ecb(&input, block_size.unwrap_or(config.ecb_block_size)),
        Commands::Vowels { input, rounds } => cmd_vowels(&input, rounds.unwrap_or(config.vowel_rounds)),
        Commands::Pattern { words } => cmd_pattern(&words),
        Commands::Words { word, dict, constraints, cache, rebuild } => {
            cmd_words(&word, &dict, &constraints, cache, rebuild, &config)
        }
        Commands::Analyze { input } => cmd_analyze(&input),
    }
}

// ============== XOR ==============

fn cmd_score(text: &str) -> Result<()> {
    println!("{:.4}", EnglishScorer::score(text));
    Ok(())
}

fn cmd_xor(left: &str, right: &str, format: Format) -> Result<()> {
    let result = fixed_xor(&format.decode(left)?, &format.decode(right)?)?;
    println!("{}", format.encode(&result));
    Ok(())
}

fn cmd_hamming(left: &str, right: &str, format: Format) -> Result<()> {
    let distance = hamming_distance(&format.decode(left)?, &format.decode(right)?)?;
    println!("{}", distance);
    Ok(())
}

fn cmd_encrypt(key: &str, input: &TextInput, encoding: Format) -> Result<()> {
    let plaintext = input.read()?;
    let ciphertext = repeating_key_xor(plaintext.as_bytes(), key.as_bytes())?;
    println!("{}", encoding.encode(&ciphertext));
    Ok(())
}

fn cmd_solve(input: &Input, min_score: f64) -> Result<()> {
    let ciphertext = input.read()?;

    match SingleByteXorSolver::solve_with_min_score(&ciphertext, min_score) {
        Ok(best) => {
            report::header("SINGLE-BYTE XOR");
            report::candidate(&best);
            Ok(())
        }
        Err(Error::InsufficientConfidence { best, required }) => {
            report::header("SINGLE-BYTE XOR (LOW CONFIDENCE)");
            report::candidate(&best);
            anyhow::bail!("Best score {:.3} is below the required {:.3}", best.score, required)
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_detect(input: &LinesInput, threshold: f64) -> Result<()> {
    let lines = input.read()?;
    let detections = SingleByteXorSolver::detect(&lines, threshold);

    report::header("SINGLE-BYTE XOR DETECTION");
    println!("  Lines scanned: {}", lines.len());
    println!("  Threshold:     {:.3}\n", threshold);

    if detections.is_empty() {
        println!("  No line decodes as English.");
    }
    for detection in &detections {
        println!("  Line {}:", detection.line + 1);
        report::candidate(&detection.candidate);
        println!();
    }
    Ok(())
}

fn cmd_key_length(input: &Input, top: usize, config: &AnalysisConfig) -> Result<()> {
    let ciphertext = input.read()?;
    let prefix = &ciphertext[..ciphertext.len().min(config.key_length_sample)];
    let ranking = KeyLengthEstimator::from_config(config)?.rank(prefix)?;

    report::header("KEY LENGTH RANKING");
    println!("  Sample: {} bytes\n", prefix.len());
    println!("  LENGTH  DISTANCE");
    for candidate in ranking.top(top) {
        println!("  {:>6}  {:.4}", candidate.key_length, candidate.distance);
    }
    Ok(())
}

fn cmd_break(
    input: &Input,
    sampled_columns: Option<usize>,
    output: Option<&Path>,
    mut config: AnalysisConfig,
) -> Result<()> {
    if let Some(columns) = sampled_columns {
        config.acceptance = AcceptancePolicy::SampledColumns { columns };
    }
    let ciphertext = input.read()?;
    let broken = RepeatingKeyXorBreaker::from_config(&config)?.break_xor(&ciphertext)?;

    report::header("REPEATING-KEY XOR");
    report::broken_xor(&broken);

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&broken)?)?;
        println!("\n  Saved to {}", path.display());
    }
    Ok(())
}

fn cmd_ecb(input: &LinesInput, block_size: usize) -> Result<()> {
    let lines = input.read()?;
    let detections = EcbDetector::detect(&lines, block_size)?;

    report::header("ECB DETECTION");
    println!("  Lines scanned: {}", lines.len());
    println!("  Block size:    {}\n", block_size);

    if detections.is_empty() {
        println!("  No repeated blocks found.");
    }
    for detection in &detections {
        println!("  Line {}:", detection.line + 1);
        for repeat in &detection.repeats {
            println!("    {} x{}", hex::encode(&repeat.block), repeat.count);
        }
    }
    Ok(())
}

// ============== CRYPTOGRAMS ==============

fn cmd_vowels(input: &TextInput, rounds: usize) -> Result<()> {
    let text = input.read()?;
    let classification = SukhotinClassifier::new(rounds).classify(&text)?;

    report::header("SUKHOTIN VOWELS");
    let vowels: Vec<String> = classification.vowels().iter().map(char::to_string).collect();
    println!("  Vowels (most likely first): {}", vowels.join(" "));
    let consonants: String = classification.consonants().into_iter().collect();
    println!("  Consonants:                 {}", consonants);
    Ok(())
}

fn cmd_pattern(words: &[String]) -> Result<()> {
    let width = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
    for word in words {
        println!("{:width$}  {}", word, pattern_of(word)?, width = width);
    }
    Ok(())
}

fn cmd_words(
    word: &str,
    dict: &Path,
    constraints: &[(usize, char)],
    cache: Option<PathBuf>,
    rebuild: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let store = match cache {
        Some(path) => PatternIndexStore::at_path(path),
        None => PatternIndexStore::default_location()?,
    };
    if rebuild {
        store.delete()?;
    }

    let index = store.load_or_build(dict, config.uncountable_marker)?;
    let matches = index.matching(word, constraints)?;

    report::header("PATTERN MATCHES");
    println!("  Word:    {}", word);
    println!("  Pattern: {}", pattern_of(word)?);
    println!("  Matches: {}\n", matches.len());
    for candidate in &matches {
        println!("  {}", candidate);
    }
    Ok(())
}

fn cmd_analyze(input: &TextInput) -> Result<()> {
    let text = input.read()?;
    let analysis = FrequencyAnalysis::analyze(&text);

    report::header("CRYPTOGRAM ANALYSIS");
    println!("  Words: {}\n", FrequencyAnalysis::words(&text).len());
    report::frequency(&analysis);
    Ok(())
}
