use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    address::Address,
    crypto::{PublicKey, Signature},
    env::block_id::BlockId,
};

/// Step of a vote within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    Prevote,
    Precommit,
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteType::Prevote => "Prevote",
            VoteType::Precommit => "Precommit",
        };
        write!(f, "{}", s)
    }
}

/// A validator's vote for a block at a given height, round and step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub vote_type: VoteType,
    pub height: i64,
    pub round: i32,
    pub validator_address: Address,
    pub validator_index: i32,
    pub block_id: BlockId,
}

#[derive(Serialize)]
struct VoteSignView<'a> {
    chain_id: &'a str,
    vote_type: VoteType,
    height: i64,
    round: i32,
    validator_address: &'a Address,
    validator_index: i32,
    block_id: &'a BlockId,
}

impl Vote {
    /// Canonical bytes a validator signs for this vote on `chain_id`.
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        // Always bincode: these bytes are what signatures commit to. There is no
        // size limit and no length-less sequence, so serialization cannot fail.
        bincode::serialize(&VoteSignView {
            chain_id,
            vote_type: self.vote_type,
            height: self.height,
            round: self.round,
            validator_address: &self.validator_address,
            validator_index: self.validator_index,
            block_id: &self.block_id,
        })
        .expect("serialize vote sign view")
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.validator_address.to_string();
        write!(
            f,
            "Vote{{{}:{} {}/{:02}/{} {}}}",
            self.validator_index,
            &address[..12],
            self.height,
            self.round,
            self.vote_type,
            self.block_id
        )
    }
}

/// A vote together with the signature its validator produced over
/// [`Vote::sign_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVoteReply {
    pub vote: Vote,
    pub signature: Signature,
}

impl SignedVoteReply {
    pub fn new(vote: Vote, signature: Signature) -> Self {
        Self { vote, signature }
    }

    /// Checks the signature against `public_key` for `chain_id`.
    pub fn verify(&self, chain_id: &str, public_key: &PublicKey) -> bool {
        public_key.verify(&self.vote.sign_bytes(chain_id), &self.signature)
    }
}

impl fmt::Display for SignedVoteReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.vote, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{crypto::PrivateKey, env::block_id::PartSetHeader};

    fn vote(address: Address) -> Vote {
        Vote {
            vote_type: VoteType::Prevote,
            height: 5,
            round: 0,
            validator_address: address,
            validator_index: 0,
            block_id: BlockId::new(vec![1; 32], PartSetHeader { total: 1, hash: vec![2; 32] }),
        }
    }

    #[test]
    fn test_sign_bytes_are_chain_bound() {
        let v = vote(Address::new([3; 20]));
        assert_ne!(v.sign_bytes("chain-a"), v.sign_bytes("chain-b"));
        assert_eq!(v.sign_bytes("chain-a"), v.sign_bytes("chain-a"));
    }

    #[test]
    fn test_sign_bytes_cover_block_id() {
        let a = vote(Address::new([3; 20]));
        let mut b = a.clone();
        b.block_id.hash = vec![9; 32];
        assert_ne!(a.sign_bytes("chain"), b.sign_bytes("chain"));
    }

    #[test]
    fn test_signed_vote_verifies() {
        let key = PrivateKey::generate();
        let v = vote(key.public_key().address());
        let signature = key.sign(&v.sign_bytes("chain")).unwrap();
        let reply = SignedVoteReply::new(v, signature);

        assert!(reply.verify("chain", &key.public_key()));
        assert!(!reply.verify("other-chain", &key.public_key()));
        assert!(!reply.verify("chain", &PrivateKey::generate().public_key()));
    }

    #[test]
    fn test_display_is_compact() {
        let v = vote(Address::new([0xaa; 20]));
        let shown = v.to_string();
        assert!(shown.starts_with("Vote{0:AAAAAAAAAAAA 5/00/Prevote "));
    }
}
