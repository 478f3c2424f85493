use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub chain_id: String,
    pub priv_validator_key_file: PathBuf,
    pub priv_validator_state_file: PathBuf,
    pub block_max_bytes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: "vigil-local".to_string(),
            priv_validator_key_file: PathBuf::from("priv_validator_key.json"),
            priv_validator_state_file: PathBuf::from("priv_validator_state.json"),
            block_max_bytes: 22_020_096,
        }
    }
}

impl Config {
    pub fn with_chain_id(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            ..Self::default()
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    /// Loads a config; relative validator file paths are taken relative to
    /// the directory holding the config.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let mut parsed = serde_json::from_str::<Config>(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(base) = path.parent() {
            parsed.priv_validator_key_file = base.join(&parsed.priv_validator_key_file);
            parsed.priv_validator_state_file = base.join(&parsed.priv_validator_state_file);
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = Config::with_chain_id("roundtrip-chain");
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.chain_id, "roundtrip-chain");
        assert_eq!(loaded.block_max_bytes, config.block_max_bytes);
        assert_eq!(loaded.priv_validator_key_file, dir.path().join("priv_validator_key.json"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let key_file = dir.path().join("elsewhere").join("key.json");

        let config = Config {
            priv_validator_key_file: key_file.clone(),
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap().priv_validator_key_file, key_file);
    }

    #[test]
    fn test_invalid_config_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
