use thiserror::Error;

/// Errors raised while parsing a validator address.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid address encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
