// src/config/defaults.rs
use crate::config::app::{Keys, Naming, Paths, Worker};
use crate::consts::DEFAULT_POLL_INTERVAL_SECS;

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_LEDGER_DB: &str = "db.db";

pub fn default_paths() -> Paths {
    Paths {
        root: DEFAULT_ROOT.into(),
        raw: None,
        staging: None,
        clean: None,
        queries: None,
        ledger_db: DEFAULT_LEDGER_DB.into(),
    }
}

pub fn default_keys() -> Keys {
    Keys { seal_key_hex: None }
}

pub fn default_worker() -> Worker {
    Worker {
        poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
    }
}

pub fn default_naming() -> Naming {
    Naming {
        random_suffix: false,
    }
}
