use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use vigil_common::{utils::hex_bytes, Signature, VoteType};

use crate::{error::SigningError, persist::write_atomic};

/// Consensus step a signature was produced for. Steps are ordered within a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignStep {
    #[default]
    None,
    Propose,
    Prevote,
    Precommit,
}

impl From<VoteType> for SignStep {
    fn from(vote_type: VoteType) -> Self {
        match vote_type {
            VoteType::Prevote => SignStep::Prevote,
            VoteType::Precommit => SignStep::Precommit,
        }
    }
}

impl fmt::Display for SignStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SignStep::None => 0,
            SignStep::Propose => 1,
            SignStep::Prevote => 2,
            SignStep::Precommit => 3,
        };
        write!(f, "{}", code)
    }
}

/// What the validator signed last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSignState {
    pub height: i64,
    pub round: i32,
    pub step: SignStep,

    #[serde(default)]
    pub signature: Option<Signature>,

    #[serde(default, with = "hex_bytes")]
    pub sign_bytes: Vec<u8>,
}

impl LastSignState {
    /// Compares a request at `height/round/step` against the last signature.
    ///
    /// Returns `Ok(true)` when the request is for the same coordinate as the
    /// last signature, `Ok(false)` when it moves forward, and an error when it
    /// moves backwards.
    pub fn check_hrs(&self, height: i64, round: i32, step: SignStep) -> Result<bool, SigningError> {
        if height < self.height {
            return Err(SigningError::HeightRegression {
                got: height,
                last: self.height,
            });
        }
        if height > self.height {
            return Ok(false);
        }

        if round < self.round {
            return Err(SigningError::RoundRegression {
                height,
                got: round,
                last: self.round,
            });
        }
        if round > self.round {
            return Ok(false);
        }

        if step < self.step {
            return Err(SigningError::StepRegression {
                height,
                round,
                got: step,
                last: self.step,
            });
        }
        if step > self.step {
            return Ok(false);
        }

        if self.sign_bytes.is_empty() {
            return Err(SigningError::MissingSignBytes { height, round, step });
        }
        Ok(true)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SigningError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Durably replaces the state at `path`: after a crash the file holds
    /// either the old or the new state, and once this returns it holds the new one.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SigningError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        write_atomic(path, json.as_bytes())?;
        Ok(())
    }
}
