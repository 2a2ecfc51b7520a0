//! Analysis configuration
//!
//! Every threshold the engine uses, loadable from YAML. Missing keys fall
//! back to the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ecb::AES_BLOCK_SIZE;
use crate::key_length::{MAX_KEY_LENGTH, MIN_KEY_LENGTH};
use crate::pattern::UNCOUNTABLE_MARKER;
use crate::repeating_key::{AcceptancePolicy, KEY_LENGTH_ACCEPTANCE, KEY_LENGTH_SAMPLE};
use crate::single_byte::MIN_CONFIDENCE;
use crate::sukhotin::VOWEL_ROUNDS;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum score for a single-byte solve or line detection
    pub min_confidence: f64,

    /// Column score a key length must exceed
    pub key_length_acceptance: f64,

    /// Ciphertext prefix length used to rank key lengths
    pub key_length_sample: usize,

    pub min_key_length: usize,
    pub max_key_length: usize,

    pub acceptance: AcceptancePolicy,

    pub vowel_rounds: usize,

    /// Trailing word-list marker for entries to skip
    pub uncountable_marker: char,

    pub ecb_block_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
            key_length_acceptance: KEY_LENGTH_ACCEPTANCE,
            key_length_sample: KEY_LENGTH_SAMPLE,
            min_key_length: MIN_KEY_LENGTH,
            max_key_length: MAX_KEY_LENGTH,
            acceptance: AcceptancePolicy::default(),
            vowel_rounds: VOWEL_ROUNDS,
            uncountable_marker: UNCOUNTABLE_MARKER,
            ecb_block_size: AES_BLOCK_SIZE,
        }
    }
}

impl AnalysisConfig {
    /// `<config dir>/sleuth/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sleuth").join("config.yaml"))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// The file at `default_path`, or the defaults when there is none
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_yaml_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::MalformedInput(message));

        if self.min_key_length == 0 || self.min_key_length > self.max_key_length {
            return invalid(format!(
                "key length range {}..={} is empty or starts at zero",
                self.min_key_length, self.max_key_length
            ));
        }
        if self.key_length_sample < self.max_key_length.saturating_mul(4) {
            return invalid(format!(
                "key length sample of {} bytes cannot rank lengths up to {} (needs {})",
                self.key_length_sample,
                self.max_key_length,
                4 * self.max_key_length
            ));
        }
        if self.ecb_block_size == 0 {
            return invalid("ECB block size must be positive".into());
        }
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("key_length_acceptance", self.key_length_acceptance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must lie in [0, 1], got {}", name, value));
            }
        }
        if let AcceptancePolicy::SampledColumns { columns: 0 } = self.acceptance {
            return invalid("sampled_columns needs at least one column".into());
        }
        Ok(())
    }
}
