// tests/support.rs
//! Test fixtures: temp stage layout plus a fixed seal key

use std::fs;
use std::path::PathBuf;

use crypt_pipeline::aliases::SealKey16;
use crypt_pipeline::db::SqliteLedger;
use crypt_pipeline::key_ops::StaticKeyProvider;
use crypt_pipeline::naming::{Stage, StageLayout};
use crypt_pipeline::Pipeline;
use tempfile::{tempdir, TempDir};

#[allow(dead_code)]
pub const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

#[allow(dead_code)]
pub const OTHER_KEY_HEX: &str = "f0e0d0c0b0a090807060504030201000";

#[allow(dead_code)]
pub fn test_key() -> SealKey16 {
    SealKey16::new([
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ])
}

#[allow(dead_code)]
pub fn other_key() -> SealKey16 {
    SealKey16::new([0x5a; 16])
}

#[allow(dead_code)] // Not every test binary uses every helper
pub struct TestEnv {
    pub dir: TempDir,
    pub layout: StageLayout,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let dir = tempdir().expect("create temp dir");
        let layout = StageLayout::under(dir.path());
        layout.ensure_dirs().expect("create stage dirs");
        Self { dir, layout }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("ledger").join("db.db")
    }

    /// Place a SQL artifact in the queries stage
    pub fn write_query(&self, file_name: &str, content: &[u8]) -> PathBuf {
        let path = self.layout.stage_path(Stage::Queries, file_name);
        fs::write(&path, content).expect("write query file");
        path
    }

    pub fn stage_files(&self, stage: Stage) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.layout.dir(stage))
            .expect("read stage dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Pipeline over an in-memory ledger
    pub fn pipeline(&self) -> Pipeline<SqliteLedger, StaticKeyProvider> {
        Pipeline::new(
            self.layout.clone(),
            SqliteLedger::in_memory().expect("in-memory ledger"),
            StaticKeyProvider::new(test_key()),
        )
    }

    /// Pipeline over the on-disk ledger, as a restarted process would see it
    pub fn persistent_pipeline(&self, key_hex: &str) -> Pipeline<SqliteLedger, StaticKeyProvider> {
        Pipeline::new(
            self.layout.clone(),
            SqliteLedger::open(self.ledger_path()).expect("open ledger"),
            StaticKeyProvider::from_hex(key_hex).expect("valid key"),
        )
    }
}
