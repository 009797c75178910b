// tests/ledger_tests.rs
use crypt_pipeline::db::{Ledger, NewRecord, SqliteLedger};
use crypt_pipeline::enums::Status;
use crypt_pipeline::error::CoreError;
use tempfile::tempdir;

mod common;

fn new_record(unique: &str) -> NewRecord {
    NewRecord {
        uploader_id: Some(4_242_424),
        unique_filename: unique.to_string(),
        crypt_filename: "bookstore.crypt".to_string(),
        zip_filename: format!("{unique}.zip"),
        crypt_file_size: None,
    }
}

const AT: &str = "2024-05-06T07:08:09Z";

#[test]
fn test_create_starts_in_created_with_history() {
    common::setup();
    let mut ledger = SqliteLedger::in_memory().unwrap();

    let id = ledger.create(&new_record("bookstore_20240506070809")).unwrap();
    let record = ledger.get(id).unwrap();

    assert_eq!(record.status, Status::Created);
    assert_eq!(record.unique_filename, "bookstore_20240506070809");
    assert_eq!(record.crypt_filename.as_deref(), Some("bookstore.crypt"));
    assert_eq!(record.uploader_id, Some(4_242_424));
    assert!(!record.created_at.is_empty());
    assert!(record.zipped_at.is_none());
    assert_eq!(ledger.status_history(id).unwrap(), vec![Status::Created]);
}

#[test]
fn test_find_next_pending_returns_oldest_created() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    assert!(ledger.find_next_pending().unwrap().is_none());

    let first = ledger.create(&new_record("a_1")).unwrap();
    let second = ledger.create(&new_record("b_2")).unwrap();
    assert_eq!(ledger.find_next_pending().unwrap().unwrap().id, first);

    ledger.mark_zipped(first, AT).unwrap();
    assert_eq!(ledger.find_next_pending().unwrap().unwrap().id, second);
    assert_eq!(ledger.find_next_interrupted().unwrap().unwrap().id, first);
}

#[test]
fn test_full_transition_sequence_populates_record() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    let id = ledger.create(&new_record("bookstore_1")).unwrap();

    ledger.mark_zipped(id, AT).unwrap();
    ledger.mark_encrypted(id, "1.2 KB", AT).unwrap();
    ledger.mark_decrypted(id, "1.1 KB", AT).unwrap();
    ledger
        .mark_extracted(id, "4.0 KB", "bookstore.sql", AT)
        .unwrap();

    let record = ledger.get(id).unwrap();
    assert_eq!(record.status, Status::Extracted);
    assert_eq!(record.crypt_file_size.as_deref(), Some("1.2 KB"));
    assert_eq!(record.zip_file_size.as_deref(), Some("1.1 KB"));
    assert_eq!(record.original_file_size.as_deref(), Some("4.0 KB"));
    assert_eq!(record.final_filename.as_deref(), Some("bookstore.sql"));
    assert_eq!(record.extracted_at.as_deref(), Some(AT));
    assert_eq!(ledger.status_history(id).unwrap(), Status::SEQUENCE.to_vec());
    assert!(ledger.find_next_interrupted().unwrap().is_none());
}

#[test]
fn test_skipping_a_state_is_rejected_and_rolled_back() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    let id = ledger.create(&new_record("skip_1")).unwrap();

    let err = ledger.mark_encrypted(id, "1.0 KB", AT).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidTransition {
            from: Status::Created,
            to: Status::Encrypted,
            ..
        }
    ));

    let record = ledger.get(id).unwrap();
    assert_eq!(record.status, Status::Created);
    assert!(record.crypt_file_size.is_none());
    assert_eq!(ledger.status_history(id).unwrap(), vec![Status::Created]);
}

#[test]
fn test_reversing_a_transition_is_rejected() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    let id = ledger.create(&new_record("rev_1")).unwrap();
    ledger.mark_zipped(id, AT).unwrap();
    ledger.mark_encrypted(id, "1.0 KB", AT).unwrap();

    assert!(matches!(
        ledger.mark_zipped(id, AT),
        Err(CoreError::InvalidTransition {
            from: Status::Encrypted,
            to: Status::Zipped,
            ..
        })
    ));
    assert_eq!(ledger.get(id).unwrap().status, Status::Encrypted);
}

#[test]
fn test_error_is_reachable_from_active_states_and_absorbing() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    let id = ledger.create(&new_record("err_1")).unwrap();
    ledger.mark_zipped(id, AT).unwrap();
    ledger.mark_encrypted(id, "1.0 KB", AT).unwrap();

    ledger.mark_error(id, "Integrity check failed").unwrap();
    let record = ledger.get(id).unwrap();
    assert_eq!(record.status, Status::Error);
    assert_eq!(record.error_message.as_deref(), Some("Integrity check failed"));

    // Absorbing: no further moves, not even to error again
    assert!(ledger.mark_decrypted(id, "1.0 KB", AT).is_err());
    assert!(matches!(
        ledger.mark_error(id, "again"),
        Err(CoreError::InvalidTransition {
            from: Status::Error,
            ..
        })
    ));
    assert_eq!(
        ledger.status_history(id).unwrap(),
        vec![
            Status::Created,
            Status::Zipped,
            Status::Encrypted,
            Status::Error
        ]
    );
}

#[test]
fn test_extracted_record_cannot_be_marked_error() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    let id = ledger.create(&new_record("done_1")).unwrap();
    ledger.mark_zipped(id, AT).unwrap();
    ledger.mark_encrypted(id, "1 B", AT).unwrap();
    ledger.mark_decrypted(id, "1 B", AT).unwrap();
    ledger.mark_extracted(id, "1 B", "done.sql", AT).unwrap();

    assert!(ledger.mark_error(id, "late failure").is_err());
    assert_eq!(ledger.get(id).unwrap().status, Status::Extracted);
}

#[test]
fn test_unknown_record_is_reported() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    assert!(matches!(ledger.get(99), Err(CoreError::RecordNotFound(99))));
    assert!(matches!(
        ledger.mark_zipped(99, AT),
        Err(CoreError::RecordNotFound(99))
    ));
}

#[test]
fn test_duplicate_unique_name_is_surfaced() {
    let mut ledger = SqliteLedger::in_memory().unwrap();
    ledger.create(&new_record("same_20240506070809")).unwrap();

    let dup = ledger.create(&new_record("same_20240506070809"));
    assert!(matches!(dup, Err(CoreError::Sql(_))));
    assert_eq!(ledger.all_records().unwrap().len(), 1);
}

#[test]
fn test_committed_status_survives_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("db.db");

    let id = {
        let mut ledger = SqliteLedger::open(&db_path).unwrap();
        let id = ledger.create(&new_record("durable_1")).unwrap();
        ledger.mark_zipped(id, AT).unwrap();
        id
    };

    let mut reopened = SqliteLedger::open(&db_path).unwrap();
    let record = reopened.find_next_interrupted().unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.status, Status::Zipped);
}

#[test]
fn test_status_strings_roundtrip() {
    for status in Status::SEQUENCE.into_iter().chain([Status::Error]) {
        assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
    assert!("in_progress".parse::<Status>().is_err());
    assert_eq!(Status::Decrypted.next(), Some(Status::Extracted));
    assert_eq!(Status::Extracted.next(), None);
    assert!(Status::Error.is_terminal());
    assert!(Status::Created.can_fail());
}
