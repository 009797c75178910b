// src/naming.rs
//! Staged file naming and stage directory layout
//!
//! An artifact's `unique_name` is derived exactly once, when its unit of
//! work is created. Every later file name comes from that value or from the
//! base name; nothing here is ever recomputed from the clock mid-pipeline.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use rand::RngCore;

use crate::consts::UNIQUE_NAME_TIME_FORMAT;
use crate::error::{CoreError, Result};

/// Logical storage locations an artifact passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Raw,
    Staging,
    Clean,
    Queries,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Raw, Stage::Staging, Stage::Clean, Stage::Queries];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Staging => "staging",
            Stage::Clean => "clean",
            Stage::Queries => "queries",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw" => Ok(Stage::Raw),
            "staging" => Ok(Stage::Staging),
            "clean" => Ok(Stage::Clean),
            "queries" => Ok(Stage::Queries),
            other => Err(CoreError::UnknownStage(other.to_string())),
        }
    }
}

/// Concrete directories backing the four stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageLayout {
    pub raw: PathBuf,
    pub staging: PathBuf,
    pub clean: PathBuf,
    pub queries: PathBuf,
}

impl StageLayout {
    /// Conventional layout: one sub-directory per stage, named after it
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            raw: root.join(Stage::Raw.as_str()),
            staging: root.join(Stage::Staging.as_str()),
            clean: root.join(Stage::Clean.as_str()),
            queries: root.join(Stage::Queries.as_str()),
        }
    }

    pub fn dir(&self, stage: Stage) -> &Path {
        match stage {
            Stage::Raw => &self.raw,
            Stage::Staging => &self.staging,
            Stage::Clean => &self.clean,
            Stage::Queries => &self.queries,
        }
    }

    pub fn stage_path(&self, stage: Stage, filename: &str) -> PathBuf {
        self.dir(stage).join(filename)
    }

    /// Create every stage directory that does not exist yet
    pub fn ensure_dirs(&self) -> Result<()> {
        for stage in Stage::ALL {
            fs::create_dir_all(self.dir(stage))?;
        }
        Ok(())
    }
}

/// Stem of a file name with any directory component dropped
/// (`queries/bookstore.sql` → `bookstore`)
pub fn base_name_of(file_name: &str) -> Result<String> {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CoreError::Config(format!("cannot derive a base name from {file_name:?}")))
}

/// `<base>_<YYYYmmddHHMMSS>` at local time. Two calls for the same base
/// within one second collide; see [`unique_name_with_suffix`].
pub fn unique_name(base_name: &str) -> String {
    unique_name_at(base_name, Local::now().naive_local())
}

pub fn unique_name_at(base_name: &str, at: NaiveDateTime) -> String {
    format!("{base_name}_{}", at.format(UNIQUE_NAME_TIME_FORMAT))
}

/// Collision-resistant variant: `<base>_<YYYYmmddHHMMSS>_<8 hex chars>`
pub fn unique_name_with_suffix(base_name: &str) -> String {
    let mut suffix = [0u8; 4];
    rand::rng().fill_bytes(&mut suffix);
    format!("{}_{}", unique_name(base_name), hex::encode(suffix))
}
