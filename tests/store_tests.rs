//! Integration tests for the flat-file mock store
//!
//! Covers the persistence contract: grouping by entity, id override on save,
//! idempotent delete, group removal, and recovery from a damaged primary file.

use amock::error::MockError;
use amock::ids::MockId;
use amock::model::{MockEndpoint, MockMethod, ResponseEnvelope};
use amock::store::{FileMockStore, MockStore};
use serde_json::{json, Value};
use std::fs;

mod common;
use common::temp_files::{read, temp_data_dir, write};

fn endpoint(path: &str, method: MockMethod) -> MockEndpoint {
    MockEndpoint {
        id: MockId::new(),
        path: path.to_string(),
        method,
        description: format!("{method} {path}"),
        request_body: None,
        response_body: ResponseEnvelope::success(json!({ "id": 1 })),
    }
}

#[test]
fn test_save_then_get_all_round_trip() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let ep = endpoint("/api/user", MockMethod::Get);

    store.save(ep.id, ep.clone()).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all, vec![ep.clone()]);

    let reopened = FileMockStore::open(dir.path()).unwrap();
    assert_eq!(reopened.find(&ep.id).unwrap(), Some(ep));
}

#[test]
fn test_file_layout_is_grouped_by_entity() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let user = endpoint("/api/user/{id}", MockMethod::Put);
    let order = endpoint("/api/order", MockMethod::Post);
    store.save_batch(&[user.clone(), order.clone()]).unwrap();

    let doc: Value = serde_json::from_str(&read(store.file_path())).unwrap();
    assert_eq!(doc["user"][user.id.to_string()]["method"], "PUT");
    assert_eq!(doc["order"][order.id.to_string()]["path"], "/api/order");
    assert!(read(store.file_path()).contains('\n'), "file should be pretty-printed");
}

#[test]
fn test_save_overrides_endpoint_id() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let ep = endpoint("/api/user", MockMethod::Get);
    let chosen = MockId::new();

    store.save(chosen, ep).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, chosen);
}

#[test]
fn test_delete_is_idempotent_and_drops_empty_group() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let ep = endpoint("/api/user", MockMethod::Get);
    store.save(ep.id, ep.clone()).unwrap();

    assert!(store.delete(&ep.id, &ep).unwrap());
    assert!(!store.delete(&ep.id, &ep).unwrap());

    let doc: Value = serde_json::from_str(&read(store.file_path())).unwrap();
    assert!(doc.get("user").is_none());
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_delete_keeps_rest_of_group() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let list = endpoint("/api/user", MockMethod::Get);
    let detail = endpoint("/api/user/{id}", MockMethod::Get);
    store.save_batch(&[list.clone(), detail.clone()]).unwrap();

    assert!(store.delete(&list.id, &list).unwrap());
    assert_eq!(store.get_all().unwrap(), vec![detail]);
}

#[test]
fn test_corrupt_primary_recovers_from_backup() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let first = endpoint("/api/user", MockMethod::Get);
    let second = endpoint("/api/order", MockMethod::Get);
    store.save(first.id, first.clone()).unwrap();
    // The backup now holds the generation containing only `first`.
    store.save(second.id, second).unwrap();

    write(store.file_path(), "{ not json");

    assert_eq!(store.get_all().unwrap(), vec![first]);
}

#[test]
fn test_corrupt_primary_and_backup_yield_empty() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    write(store.file_path(), "garbage");
    write(store.backup_path(), "also garbage");

    assert!(store.get_all().unwrap().is_empty());
    let doc: Value = serde_json::from_str(&read(store.file_path())).unwrap();
    assert_eq!(doc, json!({}));
}

#[test]
fn test_invalid_path_is_rejected() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let ep = endpoint("/users", MockMethod::Get);
    let err = store.save(ep.id, ep).unwrap_err();
    assert!(matches!(err, MockError::Validation(_)));
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_unreadable_primary_and_backup_is_storage_failure() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    fs::remove_file(store.file_path()).unwrap();
    fs::create_dir(store.file_path()).unwrap();
    fs::create_dir(store.backup_path()).unwrap();

    let err = store.get_all().unwrap_err();
    assert!(matches!(err, MockError::Storage(_)));
    assert_eq!(err.status_code(), 500);
    assert!(err.message().contains("mocks.json"));

    let ep = endpoint("/api/user", MockMethod::Get);
    assert!(matches!(store.save(ep.id, ep.clone()), Err(MockError::Storage(_))));

    // the same handle works again once the files are readable
    fs::remove_dir(store.file_path()).unwrap();
    fs::remove_dir(store.backup_path()).unwrap();
    write(store.file_path(), "{}");
    store.save(ep.id, ep.clone()).unwrap();
    assert_eq!(store.get_all().unwrap(), vec![ep]);
}
