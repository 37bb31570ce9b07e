use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use msgl_chaincode::ChaincodeConfig;
use msgl_host::JournalConfig;
use serde::{Deserialize, Serialize};

/// CLI settings, read from an optional TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Journal file backing the ledger.
    pub ledger_path: PathBuf,
    pub journal: JournalConfig,
    pub chaincode: ChaincodeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(".msgl/ledger.journal"),
            journal: JournalConfig::default(),
            chaincode: ChaincodeConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
    }
}
