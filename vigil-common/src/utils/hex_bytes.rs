//! Serde adapter for byte fields.
//!
//! Human-readable formats (JSON config, key files, evidence files) carry bytes
//! as lower-case hex strings. Binary formats (bincode, used for sign-bytes and
//! canonical hashing) carry them as length-prefixed raw bytes, so the canonical
//! encoding never depends on a textual representation.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        hex::encode(bytes).serialize(serializer)
    } else {
        serializer.serialize_bytes(bytes)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    if deserializer.is_human_readable() {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(&encoded).map_err(D::Error::custom)
    } else {
        Vec::<u8>::deserialize(deserializer)
    }
}

/// Same as [`deserialize`] but requires an exact length.
pub fn deserialize_array<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    let bytes = deserialize(deserializer)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| D::Error::custom(format!("expected {} bytes, got {}", N, len)))
}
