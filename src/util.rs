//! Small utility functions used across the crate
//!
//! Size formatting and timestamps. Keep this light.

use chrono::{SecondsFormat, Utc};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size with 1024-based units and one decimal place
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Current UTC time as RFC 3339 with second precision, as stored in the ledger
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
