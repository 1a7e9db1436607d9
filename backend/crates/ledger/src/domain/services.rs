//! Domain Services
//!
//! Pure proof-of-work arithmetic for seal validation.

use sha2::{Digest, Sha256};

/// Count leading zero bits in a SHA-256 hash
pub fn count_leading_zero_bits(hash: &[u8; 32]) -> u8 {
    let mut count = 0u8;
    for &byte in hash {
        if byte == 0 {
            count = count.saturating_add(8);
        } else {
            count = count.saturating_add(byte.leading_zeros() as u8);
            break;
        }
    }
    count
}

/// Check that a hash meets the difficulty requirement
pub fn meets_difficulty(hash: &[u8; 32], difficulty_bits: u8) -> bool {
    count_leading_zero_bits(hash) >= difficulty_bits
}

/// Compute SHA-256 of the previous block hash concatenated with the proof
/// (big-endian)
pub fn compute_seal_hash(previous_hash: &str, proof: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(proof.to_be_bytes());
    hasher.finalize().into()
}

/// Validate a caller-supplied proof against the chain tip
pub fn is_valid_proof(previous_hash: &str, proof: u64, difficulty_bits: u8) -> bool {
    meets_difficulty(&compute_seal_hash(previous_hash, proof), difficulty_bits)
}

/// Search for a proof meeting the difficulty, starting from zero
///
/// Only intended for toy difficulties; the search is a plain linear scan.
pub fn find_proof(previous_hash: &str, difficulty_bits: u8) -> u64 {
    let mut proof = 0u64;
    while !is_valid_proof(previous_hash, proof, difficulty_bits) {
        proof = proof.wrapping_add(1);
    }
    proof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_bits() {
        let hash = [0u8; 32];
        assert_eq!(count_leading_zero_bits(&hash), 255); // saturates

        let mut hash = [0u8; 32];
        hash[0] = 0x01;
        assert_eq!(count_leading_zero_bits(&hash), 7);

        hash[0] = 0x80;
        assert_eq!(count_leading_zero_bits(&hash), 0);

        hash[0] = 0x00;
        hash[1] = 0x01;
        assert_eq!(count_leading_zero_bits(&hash), 15);
    }

    #[test]
    fn test_meets_difficulty() {
        let mut hash = [0u8; 32];
        hash[2] = 0x01; // 8 + 8 + 7 zero bits
        assert!(meets_difficulty(&hash, 23));
        assert!(!meets_difficulty(&hash, 24));
    }

    #[test]
    fn test_seal_hash_big_endian() {
        let proof: u64 = 0x0102030405060708;
        let hash = compute_seal_hash("prev", proof);

        let mut data = b"prev".to_vec();
        data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        let expected = platform::crypto::sha256(&data);

        assert_eq!(hash, expected);
    }

    #[test]
    fn test_find_proof_produces_valid_proof() {
        let proof = find_proof("genesis", 8);
        assert!(is_valid_proof("genesis", proof, 8));
        // Everything below the found proof fails the difficulty
        assert!(!(0..proof).any(|p| is_valid_proof("genesis", p, 8)));
    }
}
