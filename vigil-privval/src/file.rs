use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use vigil_common::{
    Address, CryptoError, Heartbeat, PrivateKey, Proposal, PublicKey, Signature, SignedVoteReply, Vote,
};

use crate::{
    error::SigningError,
    persist::write_atomic,
    state::{LastSignState, SignStep},
    validator::PrivValidator,
};

/// Key material of a file-backed validator, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePVKey {
    pub address: Address,
    pub pub_key: PublicKey,
    pub priv_key: PrivateKey,
}

impl FilePVKey {
    pub fn generate() -> Self {
        Self::from_private_key(PrivateKey::generate())
    }

    pub fn from_private_key(priv_key: PrivateKey) -> Self {
        let pub_key = priv_key.public_key();
        Self {
            address: pub_key.address(),
            pub_key,
            priv_key,
        }
    }

    /// Loads a key file and checks that its fields describe one identity.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SigningError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let key: FilePVKey = serde_json::from_str(&data)?;

        if key.priv_key.public_key() != key.pub_key || key.pub_key.address() != key.address {
            return Err(CryptoError::InvalidPublicKey(format!(
                "key file {} is inconsistent: address {} does not belong to its private key",
                path.display(),
                key.address
            ))
            .into());
        }
        Ok(key)
    }

    /// Writes the key file readable by its owner only.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SigningError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path.as_ref(), json.as_bytes())?;
        Ok(())
    }
}

/// A validator that persists what it signed and refuses to sign twice at the
/// same height, round and step.
///
/// Each request runs check, sign and persist under one lock; the signature is
/// only handed out after the new state reached the state file.
#[derive(Debug)]
pub struct FilePV {
    key: FilePVKey,
    key_file: PathBuf,
    state_file: PathBuf,
    last_sign_state: Mutex<LastSignState>,
}

impl FilePV {
    /// Creates a validator with a fresh key and empty state. Nothing is
    /// written until [`FilePV::save`].
    pub fn generate<P: Into<PathBuf>, Q: Into<PathBuf>>(key_file: P, state_file: Q) -> Self {
        Self {
            key: FilePVKey::generate(),
            key_file: key_file.into(),
            state_file: state_file.into(),
            last_sign_state: Mutex::new(LastSignState::default()),
        }
    }

    pub fn load<P: Into<PathBuf>, Q: Into<PathBuf>>(key_file: P, state_file: Q) -> Result<Self, SigningError> {
        let key_file = key_file.into();
        let state_file = state_file.into();

        let key = FilePVKey::load(&key_file)?;
        let state = LastSignState::load(&state_file)?;
        tracing::info!(
            "🔑 Loaded validator {} (last signed {}/{}/{})",
            key.address,
            state.height,
            state.round,
            state.step
        );

        Ok(Self {
            key,
            key_file,
            state_file,
            last_sign_state: Mutex::new(state),
        })
    }

    /// Loads the validator if its key file exists, otherwise generates and saves one.
    pub fn load_or_generate<P: Into<PathBuf>, Q: Into<PathBuf>>(
        key_file: P,
        state_file: Q,
    ) -> Result<Self, SigningError> {
        let key_file = key_file.into();
        let state_file = state_file.into();

        if key_file.exists() {
            return Self::load(key_file, state_file);
        }

        let pv = Self::generate(key_file, state_file);
        pv.save()?;
        tracing::info!("🔑 Generated validator {} at {}", pv.key.address, pv.key_file.display());
        Ok(pv)
    }

    /// Writes both the key file and the state file.
    pub fn save(&self) -> Result<(), SigningError> {
        self.key.save(&self.key_file)?;
        let state = self.last_sign_state.lock().map_err(|_| SigningError::StatePoisoned)?;
        state.save(&self.state_file)
    }

    /// Forgets everything signed so far. Unsafe: the validator can then sign
    /// again at coordinates it already signed.
    pub fn reset(&self) -> Result<(), SigningError> {
        let mut state = self.last_sign_state.lock().map_err(|_| SigningError::StatePoisoned)?;
        let fresh = LastSignState::default();
        fresh.save(&self.state_file)?;
        *state = fresh;
        tracing::warn!("Reset sign state of validator {}", self.key.address);
        Ok(())
    }

    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Snapshot of the last sign state.
    pub fn last_sign_state(&self) -> Result<LastSignState, SigningError> {
        let state = self.last_sign_state.lock().map_err(|_| SigningError::StatePoisoned)?;
        Ok(state.clone())
    }

    fn sign_checked(
        &self,
        height: i64,
        round: i32,
        step: SignStep,
        sign_bytes: Vec<u8>,
    ) -> Result<Signature, SigningError> {
        let mut state = self.last_sign_state.lock().map_err(|_| SigningError::StatePoisoned)?;

        if state.check_hrs(height, round, step)? {
            if let (true, Some(signature)) = (state.sign_bytes == sign_bytes, state.signature) {
                tracing::debug!("Re-using signature for {}/{}/{}", height, round, step);
                return Ok(signature);
            }
            tracing::warn!(
                "⚠️ Refusing to double sign at {}/{}/{} for validator {}",
                height,
                round,
                step,
                self.key.address
            );
            return Err(SigningError::ConflictingData { height, round, step });
        }

        let signature = self.key.priv_key.sign(&sign_bytes)?;
        let next = LastSignState {
            height,
            round,
            step,
            signature: Some(signature),
            sign_bytes,
        };
        next.save(&self.state_file)?;
        *state = next;

        tracing::info!("✍️ Signed {}/{}/{} as {}", height, round, step, self.key.address);
        Ok(signature)
    }
}

impl PrivValidator for FilePV {
    fn address(&self) -> Address {
        self.key.address
    }

    fn public_key(&self) -> PublicKey {
        self.key.pub_key
    }

    fn sign_vote(&self, chain_id: &str, vote: &Vote) -> Result<SignedVoteReply, SigningError> {
        let signature = self.sign_checked(
            vote.height,
            vote.round,
            vote.vote_type.into(),
            vote.sign_bytes(chain_id),
        )?;
        Ok(SignedVoteReply::new(vote.clone(), signature))
    }

    fn sign_proposal(&self, chain_id: &str, proposal: &Proposal) -> Result<Proposal, SigningError> {
        let signature = self.sign_checked(
            proposal.height,
            proposal.round,
            SignStep::Propose,
            proposal.sign_bytes(chain_id),
        )?;
        Ok(proposal.with_signature(signature))
    }

    /// Heartbeats are not consensus messages and are signed without checks.
    fn sign_heartbeat(&self, chain_id: &str, heartbeat: &Heartbeat) -> Result<Heartbeat, SigningError> {
        let signature = self.key.priv_key.sign(&heartbeat.sign_bytes(chain_id))?;
        Ok(heartbeat.with_signature(signature))
    }
}

impl fmt::Display for FilePV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_sign_state.lock() {
            Ok(state) => write!(
                f,
                "PrivValidator{{{} LH:{}, LR:{}, LS:{}}}",
                self.key.address, state.height, state.round, state.step
            ),
            Err(_) => write!(f, "PrivValidator{{{}}}", self.key.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vigil_common::{BlockId, PartSetHeader, VoteType};

    const CHAIN_ID: &str = "file-pv-chain";

    fn setup() -> (TempDir, FilePV) {
        let dir = tempfile::tempdir().unwrap();
        let pv = FilePV::load_or_generate(dir.path().join("key.json"), dir.path().join("state.json")).unwrap();
        (dir, pv)
    }

    fn block(tag: u8) -> BlockId {
        BlockId::new(vec![tag; 32], PartSetHeader { total: 1, hash: vec![tag; 32] })
    }

    fn vote(pv: &FilePV, vote_type: VoteType, height: i64, round: i32, tag: u8) -> Vote {
        Vote {
            vote_type,
            height,
            round,
            validator_address: pv.address(),
            validator_index: 0,
            block_id: block(tag),
        }
    }

    fn proposal(height: i64, round: i32, tag: u8) -> Proposal {
        Proposal {
            height,
            round,
            block_id: block(tag),
            pol_round: -1,
            pol_block_id: BlockId::default(),
            signature: None,
        }
    }

    #[test]
    fn test_sign_vote_verifies() {
        let (_dir, pv) = setup();
        let signed = pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 1, 0, 1)).unwrap();
        assert!(signed.verify(CHAIN_ID, &pv.public_key()));

        let state = pv.last_sign_state().unwrap();
        assert_eq!((state.height, state.round, state.step), (1, 0, SignStep::Prevote));
        assert_eq!(state.signature, Some(signed.signature));
    }

    #[test]
    fn test_same_vote_returns_same_signature() {
        let (_dir, pv) = setup();
        let v = vote(&pv, VoteType::Prevote, 1, 0, 1);
        let first = pv.sign_vote(CHAIN_ID, &v).unwrap();
        let again = pv.sign_vote(CHAIN_ID, &v).unwrap();
        assert_eq!(first.signature, again.signature);
    }

    #[test]
    fn test_conflicting_vote_is_refused() {
        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 1, 0, 1)).unwrap();
        let before = pv.last_sign_state().unwrap();

        let err = pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 1, 0, 2)).unwrap_err();
        assert!(matches!(
            err,
            SigningError::ConflictingData { height: 1, round: 0, step: SignStep::Prevote }
        ));
        assert_eq!(pv.last_sign_state().unwrap(), before);
    }

    #[test]
    fn test_other_chain_is_a_conflict() {
        let (_dir, pv) = setup();
        let v = vote(&pv, VoteType::Prevote, 1, 0, 1);
        pv.sign_vote(CHAIN_ID, &v).unwrap();
        assert!(matches!(
            pv.sign_vote("another-chain", &v),
            Err(SigningError::ConflictingData { .. })
        ));
    }

    #[test]
    fn test_regressions_are_refused() {
        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 5, 2, 1)).unwrap();

        assert!(matches!(
            pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 4, 2, 1)),
            Err(SigningError::HeightRegression { .. })
        ));
        assert!(matches!(
            pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 5, 1, 1)),
            Err(SigningError::RoundRegression { .. })
        ));
        assert!(matches!(
            pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 5, 2, 1)),
            Err(SigningError::StepRegression { .. })
        ));
        assert!(matches!(
            pv.sign_proposal(CHAIN_ID, &proposal(5, 2, 1)),
            Err(SigningError::StepRegression { .. })
        ));
    }

    #[test]
    fn test_round_progression() {
        let (_dir, pv) = setup();
        let signed = pv.sign_proposal(CHAIN_ID, &proposal(3, 0, 1)).unwrap();
        assert!(signed.signature.is_some());
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 3, 0, 1)).unwrap();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 3, 0, 1)).unwrap();
        pv.sign_proposal(CHAIN_ID, &proposal(3, 1, 2)).unwrap();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 4, 0, 3)).unwrap();
    }

    #[test]
    fn test_heartbeat_is_not_checked() {
        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 9, 0, 1)).unwrap();

        let heartbeat = Heartbeat {
            validator_address: pv.address(),
            validator_index: 0,
            height: 1,
            round: 0,
            sequence: 4,
            signature: None,
        };
        let signed = pv.sign_heartbeat(CHAIN_ID, &heartbeat).unwrap();
        assert!(signed.signature.is_some());
        assert_eq!(pv.last_sign_state().unwrap().height, 9);
    }

    #[test]
    fn test_reset_allows_signing_again() {
        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 2, 0, 1)).unwrap();
        pv.reset().unwrap();

        assert_eq!(pv.last_sign_state().unwrap(), LastSignState::default());
        assert!(pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 2, 0, 2)).is_ok());
    }

    #[test]
    fn test_inconsistent_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");

        let mut key = FilePVKey::generate();
        key.address = Address::new([0xAB; 20]);
        key.save(&path).unwrap();

        assert!(matches!(FilePVKey::load(&path), Err(SigningError::Crypto(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_validator_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Prevote, 1, 0, 1)).unwrap();

        for path in [pv.key_file(), pv.state_file()] {
            let mode = fs::metadata(path).unwrap().permissions().mode();
            assert_eq!(mode & 0o077, 0, "{} has mode {:o}", path.display(), mode & 0o777);
        }
    }

    #[test]
    fn test_display_shows_last_state() {
        let (_dir, pv) = setup();
        pv.sign_vote(CHAIN_ID, &vote(&pv, VoteType::Precommit, 7, 1, 1)).unwrap();
        assert_eq!(pv.to_string(), format!("PrivValidator{{{} LH:7, LR:1, LS:3}}", pv.address()));
    }
}
