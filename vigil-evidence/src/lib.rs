//! Byzantine-fault evidence.
//!
//! Proves, canonically encodes and aggregates validator equivocation:
//!
//! - [`Evidence`] / [`EvidenceProof`]: the closed set of evidence kinds and the
//!   operations they share.
//! - [`DuplicateVoteEvidence`]: two conflicting votes signed by one validator.
//! - [`EvidenceList`]: ordered evidence with a Merkle root for block headers.
//! - [`EvidenceRegistry`]: tag-based binary codec bounded by [`MAX_EVIDENCE_BYTES`].
//! - [`ConflictDetector`]: builds duplicate-vote evidence from observed votes.
//!
//! Verification and hashing are pure: no I/O, no locks, safe to run on many
//! pieces of evidence concurrently.

pub mod detector;
pub mod error;
pub mod evidence;
pub mod limits;
pub mod list;
pub mod registry;

pub use detector::ConflictDetector;
pub use error::{CodecError, InvalidEvidence, VerificationError, VoteSide};
pub use evidence::{DuplicateVoteEvidence, Evidence, EvidenceProof, MockBadEvidence, MockGoodEvidence};
pub use limits::{max_evidence_bytes_per_block, max_evidence_per_block, MAX_EVIDENCE_BYTES};
pub use list::EvidenceList;
pub use registry::EvidenceRegistry;
