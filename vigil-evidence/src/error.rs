use std::fmt;

use thiserror::Error;
use vigil_common::{Address, BlockId, PublicKey, VoteType};

use crate::evidence::Evidence;

/// Which of the two votes of a duplicate-vote proof failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSide {
    A,
    B,
}

impl fmt::Display for VoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteSide::A => write!(f, "A"),
            VoteSide::B => write!(f, "B"),
        }
    }
}

/// Why a piece of evidence does not prove misbehavior.
///
/// Each check of the duplicate-vote verification has its own variant so that
/// callers can tell a harmless non-conflict from a forged proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The votes are for different coordinates; two unrelated votes, not equivocation.
    #[error("H/R/S does not match. Got {height_a}/{round_a}/{type_a} and {height_b}/{round_b}/{type_b}")]
    HeightRoundStepMismatch {
        height_a: i64,
        round_a: i32,
        type_a: VoteType,
        height_b: i64,
        round_b: i32,
        type_b: VoteType,
    },

    #[error("Validator addresses do not match. Got {0} and {1}")]
    ValidatorAddressMismatch(Address, Address),

    #[error("Validator indices do not match. Got {0} and {1}")]
    ValidatorIndexMismatch(i32, i32),

    /// Both votes reference the same block, so nothing conflicting was signed.
    #[error("BlockIDs are the same ({0}) - not a real duplicate vote")]
    SameBlockId(BlockId),

    /// The supplied key does not belong to the accused validator.
    #[error("FAILED SANITY CHECK - address ({address}) doesn't match pubkey ({pubkey} - {derived})")]
    PubKeyAddressMismatch {
        address: Address,
        pubkey: PublicKey,
        derived: Address,
    },

    #[error("Error verifying vote {0}: invalid signature")]
    InvalidSignature(VoteSide),

    /// Returned by the always-failing test evidence.
    #[error("MockBadEvidence")]
    Mock,
}

/// A piece of evidence that failed verification, kept together with the cause.
///
/// The evidence is retained so the caller can decide what to do with whoever
/// submitted it.
#[derive(Debug, Error)]
#[error("Invalid evidence: {source}. Evidence: {evidence}")]
pub struct InvalidEvidence {
    pub evidence: Box<Evidence>,
    pub source: VerificationError,
}

impl InvalidEvidence {
    pub fn new(evidence: Evidence, source: VerificationError) -> Self {
        Self {
            evidence: Box::new(evidence),
            source,
        }
    }
}

/// Failures of the tagged binary evidence codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Encoded evidence is {size} bytes, maximum is {max}")]
    TooLarge { size: usize, max: usize },

    /// The frame names a type tag nothing was registered for.
    #[error("Unknown evidence type tag: {0}")]
    UnknownTag(String),

    /// The evidence variant is not registered with this registry.
    #[error("Evidence type {0} is not registered")]
    Unregistered(&'static str),

    #[error("Evidence type {0} is already registered")]
    DuplicateTag(&'static str),

    #[error("Malformed evidence encoding: {0}")]
    Malformed(#[from] bincode::Error),
}
