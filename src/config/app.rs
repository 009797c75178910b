use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::{DEFAULT_CONFIG_FILE, ENV_CONFIG, ENV_LEDGER_DB, ENV_ROOT, ENV_SEAL_KEY};
use crate::error::{CoreError, Result};
use crate::key_ops::StaticKeyProvider;
use crate::naming::{Stage, StageLayout};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub keys: Keys,
    pub worker: Worker,
    pub naming: Naming,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Base directory; relative stage dirs and the ledger resolve against it
    pub root: PathBuf,
    pub raw: Option<PathBuf>,
    pub staging: Option<PathBuf>,
    pub clean: Option<PathBuf>,
    pub queries: Option<PathBuf>,
    pub ledger_db: PathBuf,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub seal_key_hex: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Worker {
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Append `_<8 hex>` to unique names
    pub random_suffix: bool,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Keys {
    fn default() -> Self {
        default_keys()
    }
}

impl Default for Worker {
    fn default() -> Self {
        default_worker()
    }
}

impl Default for Naming {
    fn default() -> Self {
        default_naming()
    }
}

// Never print key material
impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field(
                "seal_key_hex",
                &self.seal_key_hex.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `CRYPTER_*` overrides; `lookup` is `std::env::var` in production
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_ROOT) {
            self.paths.root = root.into();
        }
        if let Some(db) = lookup(ENV_LEDGER_DB) {
            self.paths.ledger_db = db.into();
        }
        if let Some(key) = lookup(ENV_SEAL_KEY) {
            self.keys.seal_key_hex = Some(key);
        }
    }

    pub fn layout(&self) -> StageLayout {
        let resolve = |custom: &Option<PathBuf>, stage: Stage| match custom {
            Some(dir) => self.paths.root.join(dir),
            None => self.paths.root.join(stage.as_str()),
        };
        StageLayout {
            raw: resolve(&self.paths.raw, Stage::Raw),
            staging: resolve(&self.paths.staging, Stage::Staging),
            clean: resolve(&self.paths.clean, Stage::Clean),
            queries: resolve(&self.paths.queries, Stage::Queries),
        }
    }

    pub fn ledger_db_path(&self) -> PathBuf {
        self.paths.root.join(&self.paths.ledger_db)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.worker.poll_interval_secs)
    }

    pub fn key_provider(&self) -> Result<StaticKeyProvider> {
        let hex = self.keys.seal_key_hex.as_deref().ok_or_else(|| {
            CoreError::Config(format!(
                "no seal key configured; set [keys] seal_key_hex or {ENV_SEAL_KEY}"
            ))
        })?;
        StaticKeyProvider::from_hex(hex)
    }
}

/// Read a TOML config file (no env overrides)
pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Config::from_toml_str(&content)
}

/// Load config at runtime: `CRYPTER_CONFIG` or `crypter.toml`, falling back
/// to built-in defaults when the file is missing, then env overrides.
pub fn load() -> Result<Config> {
    let config_path =
        std::env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = if Path::new(&config_path).exists() {
        load_from(&config_path)?
    } else {
        warn!(path = %config_path, "config file not found, using built-in defaults");
        Config::default()
    };

    conf.apply_overrides(|name| std::env::var(name).ok());
    Ok(conf)
}
