// src/export/json.rs
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::info;

use crate::db::{Ledger, SqliteLedger};
use crate::error::Result;

/// Write every ledger record, with its status history, to `path` as pretty JSON.
///
/// Returns the number of records exported.
pub fn export_ledger_json<P: AsRef<Path>>(ledger: &mut SqliteLedger, path: P) -> Result<usize> {
    let records = ledger.all_records()?;

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let history = ledger.status_history(record.id)?;
        let mut entry = serde_json::to_value(&record)?;
        entry["status_history"] = serde_json::to_value(history)?;
        entries.push(entry);
    }

    let count = entries.len();
    let export = json!({
        "export_format": "crypt-pipeline-ledger-v1",
        "exported_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "exporter_version": env!("CARGO_PKG_VERSION"),
        "total_records": count,
        "records": entries,
    });

    std::fs::write(path.as_ref(), serde_json::to_string_pretty(&export)?)?;
    info!(
        count,
        path = %path.as_ref().display(),
        "ledger exported"
    );

    Ok(count)
}
