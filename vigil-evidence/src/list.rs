use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::crypto::merkle::simple_hash_from_two_hashes;

use crate::evidence::Evidence;

/// Ordered evidence committed into a block.
///
/// Order is part of the content: the same items in another order hash
/// differently. Callers pick the canonical order before committing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceList(Vec<Evidence>);

impl EvidenceList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, evidence: Evidence) {
        self.0.push(evidence);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Evidence> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Evidence] {
        &self.0
    }

    /// Merkle root over the item hashes. The empty list hashes to no bytes.
    ///
    /// Bit-identical to `simple_hash_from_hashes` over `item.hash()` for every
    /// item, but recurses over sub-slices instead of materializing the leaves.
    pub fn hash(&self) -> Vec<u8> {
        hash_range(&self.0)
    }

    /// True if some item is `equal` to `evidence`.
    pub fn has(&self, evidence: &Evidence) -> bool {
        self.0.iter().any(|ev| ev.equal(evidence))
    }
}

fn hash_range(items: &[Evidence]) -> Vec<u8> {
    match items.len() {
        0 => Vec::new(),
        1 => items[0].hash(),
        n => {
            let (left, right) = items.split_at((n + 1) / 2);
            simple_hash_from_two_hashes(&hash_range(left), &hash_range(right))
        }
    }
}

impl From<Vec<Evidence>> for EvidenceList {
    fn from(items: Vec<Evidence>) -> Self {
        Self(items)
    }
}

impl FromIterator<Evidence> for EvidenceList {
    fn from_iter<I: IntoIterator<Item = Evidence>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EvidenceList {
    type Item = Evidence;
    type IntoIter = std::vec::IntoIter<Evidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EvidenceList {
    type Item = &'a Evidence;
    type IntoIter = std::slice::Iter<'a, Evidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for EvidenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ev in &self.0 {
            write!(f, "{}\t\t", ev)?;
        }
        Ok(())
    }
}
