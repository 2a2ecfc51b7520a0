//! ECB detection
//!
//! ECB encrypts equal plaintext blocks to equal ciphertext blocks, so a
//! repeated block in a ciphertext is a strong ECB signal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const AES_BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedBlock {
    pub block: Vec<u8>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcbDetection {
    /// Zero-based index of the line in the input
    pub line: usize,
    pub repeats: Vec<RepeatedBlock>,
}

pub struct EcbDetector;

impl EcbDetector {
    /// Blocks occurring more than once, in order of first appearance.
    ///
    /// A trailing partial block is counted as a block of its own.
    pub fn repeated_blocks(ciphertext: &[u8], block_size: usize) -> Result<Vec<RepeatedBlock>> {
        if block_size == 0 {
            return Err(Error::MalformedInput("block size must be positive".into()));
        }

        let mut order: Vec<&[u8]> = Vec::new();
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        for block in ciphertext.chunks(block_size) {
            let count = counts.entry(block).or_insert(0);
            if *count == 0 {
                order.push(block);
            }
            *count += 1;
        }

        Ok(order
            .into_iter()
            .filter_map(|block| {
                let count = counts[block];
                (count > 1).then(|| RepeatedBlock {
                    block: block.to_vec(),
                    count,
                })
            })
            .collect())
    }

    pub fn is_ecb(ciphertext: &[u8], block_size: usize) -> Result<bool> {
        Ok(!Self::repeated_blocks(ciphertext, block_size)?.is_empty())
    }

    /// Lines containing at least one repeated block
    pub fn detect<T: AsRef<[u8]>>(lines: &[T], block_size: usize) -> Result<Vec<EcbDetection>> {
        let mut found = Vec::new();
        for (line, ciphertext) in lines.iter().enumerate() {
            let repeats = Self::repeated_blocks(ciphertext.as_ref(), block_size)?;
            if !repeats.is_empty() {
                found.push(EcbDetection { line, repeats });
            }
        }
        Ok(found)
    }
}
