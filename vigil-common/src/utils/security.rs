use rand::{rngs::OsRng, RngCore};

/// Fresh 32-byte seed from the OS RNG, used as ed25519 secret key material.
pub fn generate_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_length() {
        let seed = generate_seed();
        assert_eq!(seed.len(), 32, "Seed should be exactly 32 bytes");
    }

    #[test]
    fn test_seed_randomness() {
        let seed1 = generate_seed();
        let seed2 = generate_seed();
        assert_ne!(seed1, seed2, "Seeds generated consecutively should not be equal");
    }
}
