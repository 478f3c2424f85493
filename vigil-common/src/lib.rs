//! Shared domain types for the Vigil evidence and signing crates.
//!
//! Everything consensus-critical that more than one crate must agree on lives
//! here: validator addresses, ed25519 keys and signatures, the SHA-256 based
//! two-hash Merkle combinator, and the canonical sign-bytes of the messages a
//! validator signs.

pub mod address;
pub mod crypto;
pub mod env;
pub mod utils;

pub use address::Address;
pub use crypto::{CryptoError, PrivateKey, PublicKey, Signature};
pub use env::{BlockId, Heartbeat, PartSetHeader, Proposal, SignedVoteReply, Vote, VoteType};
