use serde::{Deserialize, Serialize};

use crate::{crypto::Signature, env::block_id::BlockId};

/// A block proposal for a height and round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub height: i64,
    pub round: i32,
    pub block_id: BlockId,

    /// Round of the proof-of-lock, -1 if none.
    pub pol_round: i32,
    pub pol_block_id: BlockId,

    #[serde(default)]
    pub signature: Option<Signature>,
}

#[derive(Serialize)]
struct ProposalSignView<'a> {
    chain_id: &'a str,
    height: i64,
    round: i32,
    block_id: &'a BlockId,
    pol_round: i32,
    pol_block_id: &'a BlockId,
}

impl Proposal {
    /// Canonical bytes a proposer signs. The signature itself is not covered.
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        // No size limit and no length-less sequences: bincode cannot fail here.
        bincode::serialize(&ProposalSignView {
            chain_id,
            height: self.height,
            round: self.round,
            block_id: &self.block_id,
            pol_round: self.pol_round,
            pol_block_id: &self.pol_block_id,
        })
        .expect("serialize proposal sign view")
    }

    /// Copy of this proposal carrying `signature`.
    pub fn with_signature(&self, signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    #[test]
    fn test_signature_not_covered_by_sign_bytes() {
        let proposal = Proposal {
            height: 1,
            round: 0,
            block_id: BlockId::default(),
            pol_round: -1,
            pol_block_id: BlockId::default(),
            signature: None,
        };
        let key = PrivateKey::generate();
        let signature = key.sign(&proposal.sign_bytes("chain")).unwrap();
        let signed = proposal.with_signature(signature);

        assert_eq!(signed.sign_bytes("chain"), proposal.sign_bytes("chain"));
        assert!(key.public_key().verify(&signed.sign_bytes("chain"), &signature));
        assert!(proposal.signature.is_none());
    }
}
