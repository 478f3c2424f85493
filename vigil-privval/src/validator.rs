use std::sync::Arc;

use vigil_common::{Address, Heartbeat, Proposal, PublicKey, SignedVoteReply, Vote};

use crate::error::SigningError;

/// A local validator's signing authority.
///
/// Implementations own exactly one private key. A conforming implementation
/// never signs two different values at the same height, round and step, since
/// that is precisely what duplicate-vote evidence proves.
pub trait PrivValidator: Send + Sync {
    /// Always equal to `self.public_key().address()`.
    fn address(&self) -> Address;

    fn public_key(&self) -> PublicKey;

    /// Signs `vote` for `chain_id`.
    fn sign_vote(&self, chain_id: &str, vote: &Vote) -> Result<SignedVoteReply, SigningError>;

    /// Returns a copy of `proposal` carrying the signature.
    fn sign_proposal(&self, chain_id: &str, proposal: &Proposal) -> Result<Proposal, SigningError>;

    /// Returns a copy of `heartbeat` carrying the signature.
    fn sign_heartbeat(&self, chain_id: &str, heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError>;
}

impl<T: PrivValidator + ?Sized> PrivValidator for Box<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign_vote(&self, chain_id: &str, vote: &Vote) -> Result<SignedVoteReply, SigningError> {
        (**self).sign_vote(chain_id, vote)
    }

    fn sign_proposal(&self, chain_id: &str, proposal: &Proposal) -> Result<Proposal, SigningError> {
        (**self).sign_proposal(chain_id, proposal)
    }

    fn sign_heartbeat(&self, chain_id: &str, heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError> {
        (**self).sign_heartbeat(chain_id, heartbeat)
    }
}

impl<T: PrivValidator + ?Sized> PrivValidator for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign_vote(&self, chain_id: &str, vote: &Vote) -> Result<SignedVoteReply, SigningError> {
        (**self).sign_vote(chain_id, vote)
    }

    fn sign_proposal(&self, chain_id: &str, proposal: &Proposal) -> Result<Proposal, SigningError> {
        (**self).sign_proposal(chain_id, proposal)
    }

    fn sign_heartbeat(&self, chain_id: &str, heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError> {
        (**self).sign_heartbeat(chain_id, heartbeat)
    }
}

/// Sorts validators by ascending address, comparing addresses as unsigned bytes.
pub fn sort_by_address<P: PrivValidator>(validators: &mut [P]) {
    validators.sort_by_key(|pv| pv.address());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPV;

    #[test]
    fn test_sort_by_address_is_ascending() {
        let mut pvs: Vec<MockPV> = (0..8).map(|_| MockPV::new()).collect();
        sort_by_address(&mut pvs);

        for pair in pvs.windows(2) {
            assert!(pair[0].address().as_bytes() < pair[1].address().as_bytes());
        }
    }

    #[test]
    fn test_sort_trait_objects() {
        let mut pvs: Vec<Box<dyn PrivValidator>> = (0..5)
            .map(|_| Box::new(MockPV::new()) as Box<dyn PrivValidator>)
            .collect();
        sort_by_address(&mut pvs);

        let addresses: Vec<Address> = pvs.iter().map(|pv| pv.address()).collect();
        let mut expected = addresses.clone();
        expected.sort();
        assert_eq!(addresses, expected);
    }

    #[test]
    fn test_shared_validator_delegates() {
        let pv = Arc::new(MockPV::new());
        let shared: Arc<dyn PrivValidator> = pv.clone();
        assert_eq!(shared.address(), pv.address());
        assert_eq!(shared.public_key(), pv.public_key());
    }
}
