use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::{Address, PublicKey};

use super::{Evidence, EvidenceProof};
use crate::error::VerificationError;

fn mock_hash(height: i64, address: &Address) -> Vec<u8> {
    format!("{}-{}", height, hex::encode(address)).into_bytes()
}

/// Evidence that verifies unconditionally. Only for tests; unstable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockGoodEvidence {
    pub height: i64,
    pub address: Address,
}

impl MockGoodEvidence {
    pub fn new(height: i64, address: Address) -> Self {
        Self { height, address }
    }
}

impl EvidenceProof for MockGoodEvidence {
    const TYPE_TAG: &'static str = "vigil/MockGoodEvidence";

    fn height(&self) -> i64 {
        self.height
    }

    fn address(&self) -> Address {
        self.address
    }

    fn hash(&self) -> Vec<u8> {
        mock_hash(self.height, &self.address)
    }

    fn verify(&self, _chain_id: &str, _pubkey: &PublicKey) -> Result<(), VerificationError> {
        Ok(())
    }

    fn equal(&self, other: &Evidence) -> bool {
        match other {
            Evidence::MockGood(other) => self.height == other.height && self.address == other.address,
            _ => false,
        }
    }
}

impl fmt::Display for MockGoodEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GoodEvidence: {}/{}", self.height, self.address)
    }
}

/// Evidence that never verifies. Only for tests; unstable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockBadEvidence {
    pub height: i64,
    pub address: Address,
}

impl MockBadEvidence {
    pub fn new(height: i64, address: Address) -> Self {
        Self { height, address }
    }
}

impl EvidenceProof for MockBadEvidence {
    const TYPE_TAG: &'static str = "vigil/MockBadEvidence";

    fn height(&self) -> i64 {
        self.height
    }

    fn address(&self) -> Address {
        self.address
    }

    fn hash(&self) -> Vec<u8> {
        mock_hash(self.height, &self.address)
    }

    fn verify(&self, _chain_id: &str, _pubkey: &PublicKey) -> Result<(), VerificationError> {
        Err(VerificationError::Mock)
    }

    fn equal(&self, other: &Evidence) -> bool {
        match other {
            Evidence::MockBad(other) => self.height == other.height && self.address == other.address,
            _ => false,
        }
    }
}

impl fmt::Display for MockBadEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BadEvidence: {}/{}", self.height, self.address)
    }
}
