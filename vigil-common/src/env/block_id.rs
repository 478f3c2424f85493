use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::hex_bytes;

/// Header of the set of parts a block was split into for gossip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
}

/// Reference to a block. Two votes conflict when they reference different ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub parts: PartSetHeader,
}

impl BlockId {
    pub fn new(hash: Vec<u8>, parts: PartSetHeader) -> Self {
        Self { hash, parts }
    }

    /// A nil vote references the zero block id.
    pub fn is_zero(&self) -> bool {
        self.hash.is_empty() && self.parts.total == 0 && self.parts.hash.is_empty()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode_upper(&self.hash),
            self.parts.total,
            hex::encode_upper(&self.parts.hash)
        )
    }
}
