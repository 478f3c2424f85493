//! Tagged binary codec for evidence.
//!
//! A frame is the bincode encoding of `{ type_tag, payload }` where `payload`
//! is the bincode encoding of the concrete variant. Decoding looks the tag up
//! in an [`EvidenceRegistry`]; a tag with no registered decoder is an error,
//! never a fallback. Trailing bytes after the frame or after a payload are
//! rejected, so every piece of evidence has exactly one wire form.

use std::collections::HashMap;

use bincode::Options;
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::CodecError,
    evidence::{DuplicateVoteEvidence, Evidence, EvidenceProof, MockBadEvidence, MockGoodEvidence},
    limits::MAX_EVIDENCE_BYTES,
};

type DecodeFn = fn(&[u8]) -> Result<Evidence, bincode::Error>;

#[derive(Serialize, Deserialize)]
struct WireEvidence {
    type_tag: String,
    payload: Vec<u8>,
}

static GLOBAL: Lazy<EvidenceRegistry> = Lazy::new(EvidenceRegistry::with_defaults);

/// Same layout as `bincode::serialize`, minus its tolerance for trailing bytes.
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn decode_as<T>(payload: &[u8]) -> Result<Evidence, bincode::Error>
where
    T: DeserializeOwned + Into<Evidence>,
{
    wire_options().deserialize::<T>(payload).map(Into::into)
}

/// Mapping from stable type tag to decoder.
#[derive(Debug, Clone, Default)]
pub struct EvidenceRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl EvidenceRegistry {
    /// An empty registry that decodes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in variant, mocks included.
    pub fn with_defaults() -> Self {
        let mut decoders: HashMap<&'static str, DecodeFn> = HashMap::new();
        decoders.insert(DuplicateVoteEvidence::TYPE_TAG, decode_as::<DuplicateVoteEvidence>);
        decoders.insert(MockGoodEvidence::TYPE_TAG, decode_as::<MockGoodEvidence>);
        decoders.insert(MockBadEvidence::TYPE_TAG, decode_as::<MockBadEvidence>);
        Self { decoders }
    }

    /// Process-wide registry with the built-in variants, initialized on first use.
    pub fn global() -> &'static EvidenceRegistry {
        &GLOBAL
    }

    /// Registers variant `T` under its type tag. A tag can be registered once.
    pub fn register<T>(&mut self) -> Result<(), CodecError>
    where
        T: EvidenceProof + DeserializeOwned + Into<Evidence>,
    {
        if self.decoders.contains_key(T::TYPE_TAG) {
            return Err(CodecError::DuplicateTag(T::TYPE_TAG));
        }
        self.decoders.insert(T::TYPE_TAG, decode_as::<T>);
        Ok(())
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.decoders.contains_key(type_tag)
    }

    /// Registered tags in lexicographic order.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn encode(&self, evidence: &Evidence) -> Result<Vec<u8>, CodecError> {
        let type_tag = evidence.type_tag();
        if !self.is_registered(type_tag) {
            return Err(CodecError::Unregistered(type_tag));
        }

        let frame = wire_options().serialize(&WireEvidence {
            type_tag: type_tag.to_string(),
            payload: evidence.payload_bytes()?,
        })?;

        if frame.len() > MAX_EVIDENCE_BYTES {
            return Err(CodecError::TooLarge {
                size: frame.len(),
                max: MAX_EVIDENCE_BYTES,
            });
        }
        Ok(frame)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Evidence, CodecError> {
        // Size is checked before any parsing happens.
        if bytes.len() > MAX_EVIDENCE_BYTES {
            return Err(CodecError::TooLarge {
                size: bytes.len(),
                max: MAX_EVIDENCE_BYTES,
            });
        }

        let frame: WireEvidence = wire_options().deserialize(bytes)?;
        let decode = self
            .decoders
            .get(frame.type_tag.as_str())
            .ok_or_else(|| CodecError::UnknownTag(frame.type_tag.clone()))?;

        Ok(decode(&frame.payload)?)
    }
}
