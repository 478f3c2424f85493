use thiserror::Error;

/// Failures of the key and signature primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The bytes are not a valid ed25519 public key (wrong length or not a curve point).
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Raw key or signature material had an unexpected size.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Hex decoding failed: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The underlying signing operation failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl From<ed25519_dalek::SignatureError> for CryptoError {
    fn from(err: ed25519_dalek::SignatureError) -> Self {
        CryptoError::Signing(err.to_string())
    }
}
