use std::fmt;

use vigil_common::{Address, Heartbeat, PrivateKey, Proposal, PublicKey, SignedVoteReply, Vote};

use crate::{error::SigningError, validator::PrivValidator};

/// Signs anything it is asked to: no double-sign protection, no persistence,
/// no locking. Only for tests.
#[derive(Debug, Clone)]
pub struct MockPV {
    priv_key: PrivateKey,
}

impl MockPV {
    pub fn new() -> Self {
        Self::from_private_key(PrivateKey::generate())
    }

    pub fn from_private_key(priv_key: PrivateKey) -> Self {
        Self { priv_key }
    }

    /// No-op: there are no checks to disable.
    pub fn disable_checks(&self) {}
}

impl Default for MockPV {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivValidator for MockPV {
    fn address(&self) -> Address {
        self.priv_key.public_key().address()
    }

    fn public_key(&self) -> PublicKey {
        self.priv_key.public_key()
    }

    fn sign_vote(&self, chain_id: &str, vote: &Vote) -> Result<SignedVoteReply, SigningError> {
        let signature = self.priv_key.sign(&vote.sign_bytes(chain_id))?;
        Ok(SignedVoteReply::new(vote.clone(), signature))
    }

    fn sign_proposal(&self, chain_id: &str, proposal: &Proposal) -> Result<Proposal, SigningError> {
        let signature = self.priv_key.sign(&proposal.sign_bytes(chain_id))?;
        Ok(proposal.with_signature(signature))
    }

    fn sign_heartbeat(&self, chain_id: &str, heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError> {
        let signature = self.priv_key.sign(&heartbeat.sign_bytes(chain_id))?;
        Ok(heartbeat.with_signature(signature))
    }
}

impl fmt::Display for MockPV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MockPV{{{}}}", self.address())
    }
}

/// A [`MockPV`] identity whose every signing request fails.
#[derive(Debug, Clone, Default)]
pub struct ErroringMockPV {
    inner: MockPV,
}

impl ErroringMockPV {
    pub fn new() -> Self {
        Self { inner: MockPV::new() }
    }

    fn refuse(&self) -> SigningError {
        SigningError::Unavailable(format!("{} refuses to sign", self))
    }
}

impl PrivValidator for ErroringMockPV {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    fn sign_vote(&self, _chain_id: &str, _vote: &Vote) -> Result<SignedVoteReply, SigningError> {
        Err(self.refuse())
    }

    fn sign_proposal(&self, _chain_id: &str, _proposal: &Proposal) -> Result<Proposal, SigningError> {
        Err(self.refuse())
    }

    fn sign_heartbeat(&self, _chain_id: &str, _heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError> {
        Err(self.refuse())
    }
}

impl fmt::Display for ErroringMockPV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErroringMockPV{{{}}}", self.address())
    }
}
