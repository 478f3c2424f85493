use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::{crypto::hash::sum, Address, PublicKey, SignedVoteReply};

use super::{Evidence, EvidenceProof};
use crate::error::{VerificationError, VoteSide};

/// Proof that a validator signed two conflicting votes: same height, round and
/// step, different blocks.
///
/// Nothing is checked on construction; [`EvidenceProof::verify`] must be run
/// before the proof is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateVoteEvidence {
    pub pubkey: PublicKey,
    pub vote_a: SignedVoteReply,
    pub vote_b: SignedVoteReply,
}

impl DuplicateVoteEvidence {
    pub fn new(pubkey: PublicKey, vote_a: SignedVoteReply, vote_b: SignedVoteReply) -> Self {
        Self { pubkey, vote_a, vote_b }
    }
}

impl EvidenceProof for DuplicateVoteEvidence {
    const TYPE_TAG: &'static str = "vigil/DuplicateVoteEvidence";

    fn height(&self) -> i64 {
        self.vote_a.vote.height
    }

    fn address(&self) -> Address {
        self.pubkey.address()
    }

    /// SHA-256 over the canonical bincode encoding of the whole proof.
    fn hash(&self) -> Vec<u8> {
        // No size limit and no length-less sequences: bincode cannot fail here.
        let bytes = bincode::serialize(self).expect("serialize duplicate vote evidence");
        sum(&bytes).to_vec()
    }

    /// Checks, in order and stopping at the first failure:
    /// 1. same height, round and step
    /// 2. same validator address
    /// 3. same validator index
    /// 4. different block ids
    /// 5. `pubkey` derives the votes' address
    /// 6. both signatures are valid for `chain_id` under `pubkey`
    fn verify(&self, chain_id: &str, pubkey: &PublicKey) -> Result<(), VerificationError> {
        let a = &self.vote_a.vote;
        let b = &self.vote_b.vote;

        if a.height != b.height || a.round != b.round || a.vote_type != b.vote_type {
            return Err(VerificationError::HeightRoundStepMismatch {
                height_a: a.height,
                round_a: a.round,
                type_a: a.vote_type,
                height_b: b.height,
                round_b: b.round,
                type_b: b.vote_type,
            });
        }

        if a.validator_address != b.validator_address {
            return Err(VerificationError::ValidatorAddressMismatch(
                a.validator_address,
                b.validator_address,
            ));
        }

        if a.validator_index != b.validator_index {
            return Err(VerificationError::ValidatorIndexMismatch(
                a.validator_index,
                b.validator_index,
            ));
        }

        if a.block_id == b.block_id {
            return Err(VerificationError::SameBlockId(a.block_id.clone()));
        }

        // Should already hold for honest packagers; the caller's key is not trusted blindly.
        let derived = pubkey.address();
        if derived != a.validator_address {
            return Err(VerificationError::PubKeyAddressMismatch {
                address: a.validator_address,
                pubkey: *pubkey,
                derived,
            });
        }

        if !self.vote_a.verify(chain_id, pubkey) {
            return Err(VerificationError::InvalidSignature(VoteSide::A));
        }
        if !self.vote_b.verify(chain_id, pubkey) {
            return Err(VerificationError::InvalidSignature(VoteSide::B));
        }

        Ok(())
    }

    /// Content equality: same kind of evidence and same canonical hash.
    fn equal(&self, other: &Evidence) -> bool {
        match other {
            Evidence::DuplicateVote(other) => self.hash() == other.hash(),
            _ => false,
        }
    }
}

impl fmt::Display for DuplicateVoteEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteA: {}; VoteB: {}", self.vote_a, self.vote_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::MockGoodEvidence;
    use vigil_common::{BlockId, PartSetHeader, PrivateKey, Signature, Vote, VoteType};

    const CHAIN_ID: &str = "vigil-test-chain";

    fn block(tag: u8) -> BlockId {
        BlockId::new(vec![tag; 32], PartSetHeader { total: 1, hash: vec![tag; 32] })
    }

    fn vote(key: &PrivateKey, block_id: BlockId) -> Vote {
        Vote {
            vote_type: VoteType::Prevote,
            height: 5,
            round: 0,
            validator_address: key.public_key().address(),
            validator_index: 2,
            block_id,
        }
    }

    fn sign(key: &PrivateKey, vote: Vote) -> SignedVoteReply {
        let signature = key.sign(&vote.sign_bytes(CHAIN_ID)).unwrap();
        SignedVoteReply::new(vote, signature)
    }

    /// Valid evidence plus the key that produced it.
    fn valid_evidence() -> (PrivateKey, DuplicateVoteEvidence) {
        let key = PrivateKey::generate();
        let a = sign(&key, vote(&key, block(1)));
        let b = sign(&key, vote(&key, block(2)));
        (key.clone(), DuplicateVoteEvidence::new(key.public_key(), a, b))
    }

    /// Re-signs vote B after `mutate` so the failure comes from the mutated
    /// field and not from a stale signature.
    fn with_vote_b(mutate: impl FnOnce(&mut Vote)) -> (PrivateKey, DuplicateVoteEvidence) {
        let (key, mut ev) = valid_evidence();
        let mut v = ev.vote_b.vote.clone();
        mutate(&mut v);
        ev.vote_b = sign(&key, v);
        (key, ev)
    }

    #[test]
    fn test_valid_duplicate_vote_verifies() {
        let (key, ev) = valid_evidence();
        assert_eq!(ev.verify(CHAIN_ID, &key.public_key()), Ok(()));
        assert_eq!(ev.height(), 5);
        assert_eq!(ev.address(), key.public_key().address());
    }

    #[test]
    fn test_different_round_is_rejected() {
        let (key, ev) = with_vote_b(|v| v.round = 1);
        assert!(matches!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::HeightRoundStepMismatch { round_a: 0, round_b: 1, .. })
        ));
    }

    #[test]
    fn test_different_height_is_rejected() {
        let (key, ev) = with_vote_b(|v| v.height = 6);
        assert!(matches!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::HeightRoundStepMismatch { height_a: 5, height_b: 6, .. })
        ));
    }

    #[test]
    fn test_different_type_is_rejected() {
        let (key, ev) = with_vote_b(|v| v.vote_type = VoteType::Precommit);
        assert!(matches!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::HeightRoundStepMismatch {
                type_a: VoteType::Prevote,
                type_b: VoteType::Precommit,
                ..
            })
        ));
    }

    #[test]
    fn test_different_address_is_rejected() {
        let other = Address::new([9; 20]);
        let (key, ev) = with_vote_b(|v| v.validator_address = other);
        assert_eq!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::ValidatorAddressMismatch(key.public_key().address(), other))
        );
    }

    #[test]
    fn test_different_index_is_rejected() {
        let (key, ev) = with_vote_b(|v| v.validator_index = 3);
        assert_eq!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::ValidatorIndexMismatch(2, 3))
        );
    }

    #[test]
    fn test_same_block_is_not_a_duplicate() {
        let (key, ev) = with_vote_b(|v| v.block_id = block(1));
        assert_eq!(
            ev.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::SameBlockId(block(1)))
        );
    }

    #[test]
    fn test_wrong_pubkey_fails_sanity_check() {
        let (_, ev) = valid_evidence();
        let stranger = PrivateKey::generate().public_key();
        assert!(matches!(
            ev.verify(CHAIN_ID, &stranger),
            Err(VerificationError::PubKeyAddressMismatch { derived, .. }) if derived == stranger.address()
        ));
    }

    #[test]
    fn test_corrupted_signatures_are_rejected_per_vote() {
        let (key, ev) = valid_evidence();

        let corrupt = |sig: &Signature| {
            let mut bytes = *sig.as_bytes();
            bytes[10] ^= 0xff;
            Signature::from(bytes)
        };

        let mut bad_a = ev.clone();
        bad_a.vote_a.signature = corrupt(&ev.vote_a.signature);
        assert_eq!(
            bad_a.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::InvalidSignature(VoteSide::A))
        );

        let mut bad_b = ev.clone();
        bad_b.vote_b.signature = corrupt(&ev.vote_b.signature);
        assert_eq!(
            bad_b.verify(CHAIN_ID, &key.public_key()),
            Err(VerificationError::InvalidSignature(VoteSide::B))
        );
    }

    #[test]
    fn test_other_chain_id_is_rejected() {
        let (key, ev) = valid_evidence();
        assert_eq!(
            ev.verify("another-chain", &key.public_key()),
            Err(VerificationError::InvalidSignature(VoteSide::A))
        );
    }

    #[test]
    fn test_hash_is_deterministic_for_equal_content() {
        let (_, ev) = valid_evidence();

        // Independently rebuilt from serialized parts.
        let rebuilt = DuplicateVoteEvidence::new(
            PublicKey::from_bytes(&ev.pubkey.to_bytes()).unwrap(),
            serde_json::from_str(&serde_json::to_string(&ev.vote_a).unwrap()).unwrap(),
            serde_json::from_str(&serde_json::to_string(&ev.vote_b).unwrap()).unwrap(),
        );

        assert_eq!(ev.hash(), rebuilt.hash());
        assert_eq!(ev.hash().len(), 32);
        assert!(ev.equal(&rebuilt.into()));
    }

    #[test]
    fn test_swapped_votes_hash_differently() {
        let (_, ev) = valid_evidence();
        let swapped = DuplicateVoteEvidence::new(ev.pubkey, ev.vote_b.clone(), ev.vote_a.clone());
        assert_ne!(ev.hash(), swapped.hash());
        assert!(!ev.equal(&swapped.into()));
    }

    #[test]
    fn test_not_equal_to_other_variant() {
        let (_, ev) = valid_evidence();
        let mock = MockGoodEvidence::new(ev.height(), ev.address());
        assert!(!ev.equal(&mock.into()));
    }

    #[test]
    fn test_display_lists_both_votes() {
        let (_, ev) = valid_evidence();
        let shown = ev.to_string();
        assert!(shown.starts_with("VoteA: Vote{2:"));
        assert!(shown.contains("; VoteB: Vote{2:"));
    }
}
