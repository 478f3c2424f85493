use std::{error::Error, fs, path::Path};

use tracing::info;
use vigil_common::PublicKey;
use vigil_evidence::{max_evidence_bytes_per_block, max_evidence_per_block, Evidence, EvidenceList};
use vigil_privval::{FilePV, PrivValidator};

use crate::config::{Config, CONFIG_FILE};

type CliResult = Result<String, Box<dyn Error>>;

fn load_validator(config: &Config) -> Result<FilePV, Box<dyn Error>> {
    Ok(FilePV::load(&config.priv_validator_key_file, &config.priv_validator_state_file)?)
}

/// Creates `home/config.json` and the validator files it points to. Existing
/// files are kept.
pub fn init(home: &Path, chain_id: &str) -> CliResult {
    fs::create_dir_all(home)?;
    let config_path = home.join(CONFIG_FILE);

    if config_path.exists() {
        info!("Found config at {}", config_path.display());
    } else {
        Config::with_chain_id(chain_id).save_to_file(&config_path)?;
        info!("✅ Generated config at {}", config_path.display());
    }

    let config = Config::load_from_file(&config_path)?;
    let pv = FilePV::load_or_generate(&config.priv_validator_key_file, &config.priv_validator_state_file)?;

    Ok(format!("Chain: {}\nValidator: {}", config.chain_id, pv.address()))
}

pub fn show_validator(config_path: &Path) -> CliResult {
    let config = Config::load_from_file(config_path)?;
    let pv = load_validator(&config)?;

    Ok(format!(
        "Address: {}\nPubHex: {}",
        pv.address(),
        hex::encode(pv.public_key().to_bytes())
    ))
}

pub fn reset_priv_validator(config_path: &Path) -> CliResult {
    let config = Config::load_from_file(config_path)?;
    let pv = load_validator(&config)?;
    pv.reset()?;

    Ok(format!("Reset sign state at {}", pv.state_file().display()))
}

/// Verifies a single piece of evidence (JSON) on the configured chain.
pub fn verify_evidence(config_path: &Path, evidence_path: &Path, pub_key: &str) -> CliResult {
    let config = Config::load_from_file(config_path)?;
    let pub_key = PublicKey::from_hex(pub_key)?;

    let data = fs::read_to_string(evidence_path)?;
    let evidence: Evidence = serde_json::from_str(&data)?;
    evidence.check(&config.chain_id, &pub_key)?;

    Ok(format!(
        "Evidence OK: {} at height {} by {}\nHash: {}",
        evidence.type_tag(),
        evidence.height(),
        evidence.address(),
        hex::encode_upper(evidence.hash())
    ))
}

/// Hash of a JSON array of evidence, in file order.
pub fn hash_evidence(evidence_path: &Path) -> CliResult {
    let data = fs::read_to_string(evidence_path)?;
    let list: EvidenceList = serde_json::from_str(&data)?;

    Ok(format!("Items: {}\nHash: {}", list.len(), hex::encode_upper(list.hash())))
}

pub fn budget(block_max_bytes: i64) -> CliResult {
    if block_max_bytes < 0 {
        return Err(format!("block max bytes must not be negative, got {}", block_max_bytes).into());
    }
    Ok(format!(
        "Evidence bytes per block: {}\nEvidence per block: {}",
        max_evidence_bytes_per_block(block_max_bytes),
        max_evidence_per_block(block_max_bytes)
    ))
}
