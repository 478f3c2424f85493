use std::collections::{hash_map::Entry, HashMap};

use vigil_common::{Address, PublicKey, SignedVoteReply, VoteType};

use crate::{
    error::{VerificationError, VoteSide},
    evidence::{DuplicateVoteEvidence, EvidenceProof},
};

type VoteKey = (i64, i32, VoteType, Address);

/// Remembers the first signed vote each validator cast at every
/// height/round/step and turns a conflicting second vote into evidence.
#[derive(Debug, Default, Clone)]
pub struct ConflictDetector {
    // (Height, Round, Step, Validator) -> first vote seen
    votes: HashMap<VoteKey, SignedVoteReply>,
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {
            votes: HashMap::new(),
        }
    }

    /// Records `vote` cast by the holder of `pubkey` on `chain_id`.
    ///
    /// Votes that are not attributable to `pubkey` are rejected and not stored.
    /// Returns verified evidence when `vote` conflicts with the vote already
    /// recorded at the same coordinate; seeing the same vote twice is fine.
    pub fn register_vote(
        &mut self,
        chain_id: &str,
        pubkey: &PublicKey,
        vote: SignedVoteReply,
    ) -> Result<Option<DuplicateVoteEvidence>, VerificationError> {
        let derived = pubkey.address();
        if derived != vote.vote.validator_address {
            return Err(VerificationError::PubKeyAddressMismatch {
                address: vote.vote.validator_address,
                pubkey: *pubkey,
                derived,
            });
        }
        // The incoming vote would be the B side of any evidence it produces.
        if !vote.verify(chain_id, pubkey) {
            return Err(VerificationError::InvalidSignature(VoteSide::B));
        }

        let key = (
            vote.vote.height,
            vote.vote.round,
            vote.vote.vote_type,
            vote.vote.validator_address,
        );

        let existing = match self.votes.entry(key) {
            Entry::Occupied(slot) => slot.get().clone(),
            Entry::Vacant(slot) => {
                slot.insert(vote);
                return Ok(None);
            }
        };

        // Idempotency: the same block again is not a conflict.
        if existing.vote.block_id == vote.vote.block_id {
            return Ok(None);
        }

        let evidence = DuplicateVoteEvidence::new(*pubkey, existing, vote);
        evidence.verify(chain_id, pubkey)?;

        tracing::debug!(
            "⚠️ Conflicting votes from {} at {}/{}/{}",
            evidence.address(),
            key.0,
            key.1,
            key.2
        );
        Ok(Some(evidence))
    }

    /// Number of coordinates with a recorded vote.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }

    /// Forgets every vote below `height`. Returns how many were dropped.
    pub fn prune_below(&mut self, height: i64) -> usize {
        let before = self.votes.len();
        self.votes.retain(|(h, ..), _| *h >= height);
        before - self.votes.len()
    }
}
