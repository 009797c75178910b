// src/bin/crypter.rs
//! Crypter worker: enqueue SQL artifacts and drive them through the pipeline
//!
//! ```text
//! crypter enqueue <file.sql> [uploader_id]
//! crypter run [--once]
//! crypter export <path.json>
//! ```

use std::thread::sleep;

use anyhow::{bail, Context, Result};
use crypt_pipeline::config::{self, Config};
use crypt_pipeline::db::SqliteLedger;
use crypt_pipeline::error::CoreError;
use crypt_pipeline::export::export_ledger_json;
use crypt_pipeline::key_ops::StaticKeyProvider;
use crypt_pipeline::Pipeline;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: crypter <enqueue <file.sql> [uploader_id] | run [--once] | export <path>>";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let conf = config::load().context("Failed to load configuration")?;

    match args.first().map(String::as_str) {
        Some("enqueue") => {
            let file = args.get(1).context(USAGE)?;
            let uploader_id = args
                .get(2)
                .map(|s| s.parse::<i64>())
                .transpose()
                .context("uploader_id must be an integer")?;
            enqueue(&conf, file, uploader_id)
        }
        Some("run") => run(&conf, args.iter().any(|a| a == "--once")),
        Some("export") => {
            let path = args.get(1).context(USAGE)?;
            let mut ledger = open_ledger(&conf)?;
            let count = export_ledger_json(&mut ledger, path)?;
            println!("Exported {count} record(s) → {path}");
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn open_ledger(conf: &Config) -> Result<SqliteLedger> {
    let db_path = conf.ledger_db_path();
    SqliteLedger::open(&db_path)
        .with_context(|| format!("Failed to open ledger at {}", db_path.display()))
}

fn build_pipeline(conf: &Config) -> Result<Pipeline<SqliteLedger, StaticKeyProvider>> {
    let layout = conf.layout();
    layout
        .ensure_dirs()
        .context("Failed to create stage directories")?;
    let keys = conf.key_provider().context("Seal key unavailable")?;
    Ok(Pipeline::new(layout, open_ledger(conf)?, keys).with_random_suffix(conf.naming.random_suffix))
}

fn enqueue(conf: &Config, file: &str, uploader_id: Option<i64>) -> Result<()> {
    let mut pipeline = build_pipeline(conf)?;
    let (id, artifact) = pipeline
        .enqueue(file, uploader_id)
        .with_context(|| format!("Failed to enqueue {file}"))?;
    info!(id, unique_name = %artifact.unique_name, "enqueued");
    Ok(())
}

/// Poll the ledger; one artifact in flight at a time
fn run(conf: &Config, once: bool) -> Result<()> {
    let mut pipeline = build_pipeline(conf)?;
    let interval = conf.poll_interval();
    info!(interval_secs = interval.as_secs(), once, "crypter worker started");

    loop {
        match pipeline.process_next() {
            Ok(Some(report)) => {
                info!(
                    id = report.id,
                    status = %report.status,
                    final_filename = report.final_filename.as_deref().unwrap_or("-"),
                    "artifact processed"
                );
                continue;
            }
            Ok(None) if once => {
                info!("no pending work, exiting");
                return Ok(());
            }
            Ok(None) => {}
            // The record would be picked up again on the next poll
            Err(e @ CoreError::ErrorNotRecorded { .. }) => {
                return Err(e).context("Stopping worker: failure could not be recorded");
            }
            // Already recorded as `error` in the ledger; move on to the next record
            Err(e) => error!(error = %e, "artifact failed"),
        }
        sleep(interval);
    }
}
