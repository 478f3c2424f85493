pub mod error;
pub mod hash;
pub mod keys;
pub mod merkle;

pub use error::CryptoError;
pub use keys::{PrivateKey, PublicKey, Signature};
