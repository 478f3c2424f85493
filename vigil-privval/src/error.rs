use thiserror::Error;
use vigil_common::CryptoError;

use crate::state::SignStep;

/// Why a signing request was refused or failed.
///
/// None of these are retried: a refused request means signing would either
/// regress or equivocate.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Height regression. Got {got}, last height {last}")]
    HeightRegression { got: i64, last: i64 },

    #[error("Round regression at height {height}. Got {got}, last round {last}")]
    RoundRegression { height: i64, got: i32, last: i32 },

    #[error("Step regression at height {height} round {round}. Got {got}, last step {last}")]
    StepRegression {
        height: i64,
        round: i32,
        got: SignStep,
        last: SignStep,
    },

    #[error("No sign bytes recorded for {height}/{round}/{step}")]
    MissingSignBytes { height: i64, round: i32, step: SignStep },

    /// A different value was already signed at this height/round/step.
    #[error("Conflicting data at {height}/{round}/{step}: refusing to double sign")]
    ConflictingData { height: i64, round: i32, step: SignStep },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sign state lock poisoned")]
    StatePoisoned,

    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}
