// src/db/ledger_conn.rs
use std::{fs, path::Path};

use rusqlite::Connection;

use crate::error::Result;

/// Open (or create) the ledger database at `db_path` and ensure its schema
pub fn open_ledger_db<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    let db_path = db_path.as_ref();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS file_metadata (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            uploader_id        INTEGER NULL,
            unique_filename    TEXT NOT NULL UNIQUE,
            crypt_filename     TEXT,
            zip_filename       TEXT,
            final_filename     TEXT,
            original_file_size TEXT,
            zip_file_size      TEXT,
            crypt_file_size    TEXT,
            created_at         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            zipped_at          TEXT,
            encrypted_at       TEXT,
            decrypted_at       TEXT,
            extracted_at       TEXT,
            status             TEXT NOT NULL DEFAULT 'created'
                CHECK (status IN ('created', 'zipped', 'encrypted', 'decrypted', 'extracted', 'error')),
            error_message      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_file_metadata_status ON file_metadata(status);

        CREATE TABLE IF NOT EXISTS status_history (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id     INTEGER NOT NULL REFERENCES file_metadata(id),
            status      TEXT NOT NULL,
            recorded_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_status_history_file_id ON status_history(file_id);

        -- Audit trail: one row per status a record has ever held
        CREATE TRIGGER IF NOT EXISTS record_initial_status
        AFTER INSERT ON file_metadata
        BEGIN
            INSERT INTO status_history (file_id, status) VALUES (NEW.id, NEW.status);
        END;

        CREATE TRIGGER IF NOT EXISTS record_status_change
        AFTER UPDATE OF status ON file_metadata
        WHEN NEW.status IS NOT OLD.status
        BEGIN
            INSERT INTO status_history (file_id, status) VALUES (NEW.id, NEW.status);
        END;
        "#,
    )
}
