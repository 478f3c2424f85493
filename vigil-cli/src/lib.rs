//! Operator tooling for Vigil validators and evidence files.

pub mod cli;
pub mod config;
pub mod operations;
