//! XOR primitives
//!
//! Fixed XOR, repeating-key XOR and bit-level Hamming distance.

use crate::{Error, Result};

/// XOR two equal-length buffers
pub fn fixed_xor(left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(Error::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left.iter().zip(right).map(|(a, b)| a ^ b).collect())
}

pub fn xor_with_byte(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// Encrypt (or decrypt) with a key cycled across the message
pub fn repeating_key_xor(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::MalformedInput("repeating-key XOR needs a non-empty key".into()));
    }
    Ok(data
        .iter()
        .zip(key.iter().cycle())
        .map(|(a, b)| a ^ b)
        .collect())
}

/// Number of set bits across all bytes
pub fn count_ones(bytes: &[u8]) -> u32 {
    bytes.iter().map(|b| b.count_ones()).sum()
}

/// Number of differing bits between two equal-length buffers
pub fn hamming_distance(left: &[u8], right: &[u8]) -> Result<u32> {
    fixed_xor(left, right).map(|diff| count_ones(&diff))
}

/// One char per byte, Latin-1 style, so every byte value survives
pub fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_xor() {
        let left = hex::decode("1c0111001f010100061a024b53535009181c").unwrap();
        let right = hex::decode("686974207468652062756c6c277320657965").unwrap();
        let result = fixed_xor(&left, &right).unwrap();
        assert_eq!(hex::encode(result), "746865206b696420646f6e277420706c6179");
    }

    #[test]
    fn test_fixed_xor_mismatch() {
        let err = fixed_xor(b"abc", b"ab").unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 3, right: 2 }));
    }

    #[test]
    fn test_repeating_key_vector() {
        let plaintext = "Burning 'em, if you ain't quick and nimble\nI go crazy when I hear a cymbal";
        let encrypted = repeating_key_xor(plaintext.as_bytes(), b"ICE").unwrap();
        assert_eq!(
            hex::encode(&encrypted),
            "0b3637272a2b2e63622c2e69692a23693a2a3c6324202d623d63343c2a26226324272765272a282b2f20430a652e2c652a3124333a653e2b2027630c692b20283165286326302e27282f"
        );
        let decrypted = repeating_key_xor(&encrypted, b"ICE").unwrap();
        assert_eq!(decrypted, plaintext.as_bytes());
    }

    #[test]
    fn test_repeating_key_rejects_empty_key() {
        assert!(matches!(
            repeating_key_xor(b"data", b""),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_hamming() {
        assert_eq!(hamming_distance(b"this is a test", b"wokka wokka!!!").unwrap(), 37);
        assert_eq!(hamming_distance(b"same", b"same").unwrap(), 0);
    }

    #[test]
    fn test_count_ones() {
        assert_eq!(count_ones(&[0xAA, 0x00]), 4);
        assert_eq!(count_ones(&[0xAA, 0xFF]), 12);
        assert_eq!(count_ones(&[0xFF]), 8);
    }

    #[test]
    fn test_latin1_keeps_every_byte() {
        let all: Vec<u8> = (0..=u8::MAX).collect();
        let text = latin1_string(&all);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().map(|c| c as u32 as u8).collect::<Vec<_>>(), all);
    }
}
