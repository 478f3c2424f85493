//! Evidence of validator misbehavior.
//!
//! The set of evidence kinds is closed: [`Evidence`] is a sum type over every
//! registered variant and dispatches with an exhaustive match. Each variant
//! implements [`EvidenceProof`], the capability set the rest of the system
//! relies on.

mod duplicate_vote;
mod mock;

use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::{Address, PublicKey};

use crate::error::{InvalidEvidence, VerificationError};

pub use duplicate_vote::DuplicateVoteEvidence;
pub use mock::{MockBadEvidence, MockGoodEvidence};

/// Operations every kind of evidence supports.
pub trait EvidenceProof: fmt::Display {
    /// Stable type tag the variant is registered under.
    const TYPE_TAG: &'static str;

    /// Height the misbehavior occurred at.
    fn height(&self) -> i64;

    /// Address of the accused validator.
    fn address(&self) -> Address;

    /// Canonical digest of the content; identical content hashes identically
    /// on every node.
    fn hash(&self) -> Vec<u8>;

    /// Re-derives and checks the proof against `pubkey` on `chain_id`.
    fn verify(&self, chain_id: &str, pubkey: &PublicKey) -> Result<(), VerificationError>;

    /// Content equality with another piece of evidence of any kind.
    fn equal(&self, other: &Evidence) -> bool;
}

/// Any registered piece of evidence.
///
/// The JSON form is externally tagged with the registered type tags; a tag
/// that is not listed here fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evidence {
    #[serde(rename = "vigil/DuplicateVoteEvidence")]
    DuplicateVote(DuplicateVoteEvidence),

    /// Test-only evidence that always verifies. Unstable.
    #[serde(rename = "vigil/MockGoodEvidence")]
    MockGood(MockGoodEvidence),

    /// Test-only evidence that never verifies. Unstable.
    #[serde(rename = "vigil/MockBadEvidence")]
    MockBad(MockBadEvidence),
}

impl Evidence {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Evidence::DuplicateVote(_) => DuplicateVoteEvidence::TYPE_TAG,
            Evidence::MockGood(_) => MockGoodEvidence::TYPE_TAG,
            Evidence::MockBad(_) => MockBadEvidence::TYPE_TAG,
        }
    }

    pub fn height(&self) -> i64 {
        match self {
            Evidence::DuplicateVote(ev) => ev.height(),
            Evidence::MockGood(ev) => ev.height(),
            Evidence::MockBad(ev) => ev.height(),
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Evidence::DuplicateVote(ev) => ev.address(),
            Evidence::MockGood(ev) => ev.address(),
            Evidence::MockBad(ev) => ev.address(),
        }
    }

    pub fn hash(&self) -> Vec<u8> {
        match self {
            Evidence::DuplicateVote(ev) => ev.hash(),
            Evidence::MockGood(ev) => ev.hash(),
            Evidence::MockBad(ev) => ev.hash(),
        }
    }

    pub fn verify(&self, chain_id: &str, pubkey: &PublicKey) -> Result<(), VerificationError> {
        match self {
            Evidence::DuplicateVote(ev) => ev.verify(chain_id, pubkey),
            Evidence::MockGood(ev) => ev.verify(chain_id, pubkey),
            Evidence::MockBad(ev) => ev.verify(chain_id, pubkey),
        }
    }

    pub fn equal(&self, other: &Evidence) -> bool {
        match self {
            Evidence::DuplicateVote(ev) => ev.equal(other),
            Evidence::MockGood(ev) => ev.equal(other),
            Evidence::MockBad(ev) => ev.equal(other),
        }
    }

    /// Verifies and, on failure, wraps the cause together with this evidence.
    pub fn check(&self, chain_id: &str, pubkey: &PublicKey) -> Result<(), InvalidEvidence> {
        self.verify(chain_id, pubkey).map_err(|err| {
            tracing::debug!(
                height = self.height(),
                address = %self.address(),
                error = %err,
                "rejecting evidence"
            );
            InvalidEvidence::new(self.clone(), err)
        })
    }

    /// Bincode encoding of the concrete variant, without any type tag.
    pub(crate) fn payload_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        match self {
            Evidence::DuplicateVote(ev) => bincode::serialize(ev),
            Evidence::MockGood(ev) => bincode::serialize(ev),
            Evidence::MockBad(ev) => bincode::serialize(ev),
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::DuplicateVote(ev) => fmt::Display::fmt(ev, f),
            Evidence::MockGood(ev) => fmt::Display::fmt(ev, f),
            Evidence::MockBad(ev) => fmt::Display::fmt(ev, f),
        }
    }
}

impl From<DuplicateVoteEvidence> for Evidence {
    fn from(ev: DuplicateVoteEvidence) -> Self {
        Evidence::DuplicateVote(ev)
    }
}

impl From<MockGoodEvidence> for Evidence {
    fn from(ev: MockGoodEvidence) -> Self {
        Evidence::MockGood(ev)
    }
}

impl From<MockBadEvidence> for Evidence {
    fn from(ev: MockBadEvidence) -> Self {
        Evidence::MockBad(ev)
    }
}
