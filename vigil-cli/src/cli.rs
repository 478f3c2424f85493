use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil validator and evidence tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a config and a file validator under a home directory
    Init {
        #[arg(long, value_name = "DIR")]
        home: PathBuf,
        #[arg(long, default_value = "vigil-local")]
        chain_id: String,
    },
    /// Print the address and public key of the configured validator
    ShowValidator {
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
    },
    /// Forget the validator's last sign state (unsafe)
    ResetPrivValidator {
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
    },
    /// Verify a JSON evidence file against a validator public key
    VerifyEvidence {
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        evidence: PathBuf,
        #[arg(long, value_name = "HEX")]
        pub_key: String,
    },
    /// Print the Merkle hash of a JSON array of evidence
    HashEvidence {
        #[arg(short, long, value_name = "FILE")]
        evidence: PathBuf,
    },
    /// Print the evidence budget of a block
    Budget {
        #[arg(long, value_name = "N")]
        block_max_bytes: i64,
    },
}
