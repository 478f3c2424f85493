//! utils
//!
//! Small helpers shared across the Vigil crates: serde adapters for raw byte
//! fields and OS-backed randomness for key material.

pub mod hex_bytes;
pub mod security;
