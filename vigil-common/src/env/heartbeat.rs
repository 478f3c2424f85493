use serde::{Deserialize, Serialize};

use crate::{address::Address, crypto::Signature};

/// Liveness signal a validator broadcasts while waiting for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub validator_address: Address,
    pub validator_index: i32,
    pub height: i64,
    pub round: i32,
    pub sequence: i32,

    #[serde(default)]
    pub signature: Option<Signature>,
}

#[derive(Serialize)]
struct HeartbeatSignView<'a> {
    chain_id: &'a str,
    validator_address: &'a Address,
    validator_index: i32,
    height: i64,
    round: i32,
    sequence: i32,
}

impl Heartbeat {
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        // No size limit and no length-less sequences: bincode cannot fail here.
        bincode::serialize(&HeartbeatSignView {
            chain_id,
            validator_address: &self.validator_address,
            validator_index: self.validator_index,
            height: self.height,
            round: self.round,
            sequence: self.sequence,
        })
        .expect("serialize heartbeat sign view")
    }

    pub fn with_signature(&self, signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..self.clone()
        }
    }
}
