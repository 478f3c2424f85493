use sha2::{Digest, Sha256};

/// Size in bytes of every digest produced by [`sum`].
pub const HASH_SIZE: usize = 32;

/// SHA-256 of `data`.
pub fn sum(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data` as a lower-case hex string.
pub fn digest(data: &[u8]) -> String {
    hex::encode(sum(data))
}
