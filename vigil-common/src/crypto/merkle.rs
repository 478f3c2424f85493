//! Simple binary Merkle tree over an ordered list of hashes.
//!
//! This is the one place the two-hash combination rule is defined. Every
//! ordered collection committed into a block (transactions, evidence) must be
//! reduced with these functions so that all nodes derive bit-identical roots.

use sha2::{Digest, Sha256};

/// Combines two child hashes into their parent:
/// `SHA-256(u64_le(len(left)) || left || u64_le(len(right)) || right)`.
///
/// Children are length-prefixed because leaves are not guaranteed to share a
/// size.
pub fn simple_hash_from_two_hashes(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update((left.len() as u64).to_le_bytes());
    hasher.update(left);
    hasher.update((right.len() as u64).to_le_bytes());
    hasher.update(right);
    hasher.finalize().to_vec()
}

/// Merkle root of an ordered list of hashes.
///
/// - no hashes: the empty byte string
/// - one hash: that hash, unchanged
/// - otherwise: split at `(n + 1) / 2`, reduce both halves, combine
pub fn simple_hash_from_hashes<H: AsRef<[u8]>>(hashes: &[H]) -> Vec<u8> {
    match hashes.len() {
        0 => Vec::new(),
        1 => hashes[0].as_ref().to_vec(),
        n => {
            let (left, right) = hashes.split_at((n + 1) / 2);
            simple_hash_from_two_hashes(
                &simple_hash_from_hashes(left),
                &simple_hash_from_hashes(right),
            )
        }
    }
}
