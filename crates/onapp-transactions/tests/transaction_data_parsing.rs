//! Integration tests for parsing transaction data.
//!
//! These tests validate that the onapp-transactions models can deserialize a
//! recorded `transactions.json` collection response.

use chrono::{TimeZone, Utc};
use onapp_core::envelope::unwrap_many;
use onapp_transactions::models::{Transaction, TransactionFilter, TRANSACTION_ENVELOPE};
use onapp_transactions::TransactionStatus;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_transactions() -> Vec<Transaction> {
    let fixture_path = fixtures_dir().join("transaction_list.json");
    let json_data = fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read transaction fixture at {}: {}",
            fixture_path.display(),
            e
        )
    });

    let envelopes: Vec<HashMap<String, Transaction>> = serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize transaction list: {e}"));
    unwrap_many(TRANSACTION_ENVELOPE, envelopes).unwrap()
}

#[test]
fn test_deserialize_transaction_list() {
    let transactions = load_transactions();
    assert_eq!(transactions.len(), 3, "Expected 3 transactions in test data");

    let ids: Vec<i64> = transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![90412, 90377, 90100]);
}

#[test]
fn test_transaction_fields() {
    let transactions = load_transactions();
    let running = &transactions[0];

    assert_eq!(running.action.as_deref(), Some("startup_virtual_server"));
    assert_eq!(running.associated_object_id, Some(118));
    assert_eq!(running.associated_object_type.as_deref(), Some("VirtualMachine"));
    assert_eq!(running.status(), TransactionStatus::Running);
    assert!(!running.status().is_finished());
    assert_eq!(running.dependent_transaction_id, None);
    assert_eq!(
        running.created_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 14, 9, 12, 44).unwrap())
    );

    let complete = &transactions[1];
    assert_eq!(complete.status(), TransactionStatus::Complete);
    assert!(complete.log_output.as_deref().unwrap().contains("Done"));
    assert!(complete.params.is_none());
}

#[test]
fn test_offset_timestamps_are_normalized_to_utc() {
    let transactions = load_transactions();
    let failed = &transactions[2];

    assert_eq!(failed.status(), TransactionStatus::Failed);
    assert_eq!(
        failed.created_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 13, 15, 40, 0).unwrap())
    );
}

#[test]
fn test_filter_picks_first_match_in_server_order() {
    let transactions = load_transactions();

    let filter = TransactionFilter::for_object("VirtualMachine", 118, "stop_virtual_server");
    let found = transactions.iter().find(|t| filter.matches(t)).unwrap();
    assert_eq!(found.id, 90377);

    let filter = TransactionFilter::for_parent("InstancePackage", 4);
    let found = transactions.iter().find(|t| filter.matches(t)).unwrap();
    assert_eq!(found.id, 90100);
}
