//! Request router against a file-backed store
//!
//! Verifies that definitions become routable as soon as they are saved, stop
//! matching once deleted, and that `:id`-style placeholders written by older
//! stores still resolve.

use amock::error::MockError;
use amock::generator::EndpointGenerator;
use amock::ids::MockId;
use amock::model::{MockEndpoint, MockMethod, ResponseEnvelope};
use amock::llm::ChatModel;
use amock::router::{MockRouter, Pagination};
use amock::store::{FileMockStore, MockStore};
use http::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

mod common;
use common::fake_model::ScriptedModel;
use common::temp_files::{temp_data_dir, write};
use common::test_server::setup_may_runtime;

fn endpoint(path: &str, method: MockMethod, data: Value) -> MockEndpoint {
    MockEndpoint {
        id: MockId::new(),
        path: path.to_string(),
        method,
        description: "router test".to_string(),
        request_body: None,
        response_body: ResponseEnvelope::success(data),
    }
}

fn query(page: &str, page_size: &str) -> HashMap<String, String> {
    HashMap::from([
        ("page".to_string(), page.to_string()),
        ("pageSize".to_string(), page_size.to_string()),
    ])
}

#[test]
fn test_saved_definitions_are_routable_until_deleted() {
    let dir = temp_data_dir();
    let store = Arc::new(FileMockStore::open(dir.path()).unwrap());
    let router = MockRouter::new(Arc::clone(&store) as Arc<dyn MockStore>);

    assert!(matches!(
        router.match_route(&Method::GET, "/api/user/1"),
        Err(MockError::NotFound(_))
    ));

    let detail = endpoint("/api/user/{id}", MockMethod::Get, json!({ "id": 1 }));
    store.save(detail.id, detail.clone()).unwrap();
    let matched = router.match_route(&Method::GET, "/api/user/1").unwrap();
    assert_eq!(matched.endpoint.id, detail.id);

    store.delete(&detail.id, &detail).unwrap();
    assert!(router.match_route(&Method::GET, "/api/user/1").is_err());
}

#[test]
fn test_colon_placeholders_from_legacy_files() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let id = MockId::new();
    let mut group = serde_json::Map::new();
    group.insert(
        id.to_string(),
        json!({
            "id": id.to_string(),
            "path": "/api/user/:id",
            "method": "DELETE",
            "description": "remove",
            "responseBody": { "code": 0, "data": null, "msg": "success" }
        }),
    );
    let doc = json!({ "user": group });
    write(store.file_path(), &doc.to_string());

    let router = MockRouter::new(Arc::new(store));
    let matched = router.match_route(&Method::DELETE, "/api/user/abc").unwrap();
    assert_eq!(matched.get_path_param("id"), Some("abc"));
}

#[test]
fn test_pagination_formula() {
    let dir = temp_data_dir();
    let store = FileMockStore::open(dir.path()).unwrap();
    let items: Vec<Value> = (0..23).map(|i| json!({ "n": i })).collect();
    let list = endpoint(
        "/api/item",
        MockMethod::Get,
        json!({ "item_list": items, "total": 23 }),
    );
    store.save(list.id, list).unwrap();
    let router = MockRouter::new(Arc::new(store));

    for (page, size) in [(1usize, 10usize), (2, 10), (3, 10), (2, 7), (5, 5)] {
        let body = router
            .respond(&Method::GET, "/api/item", &query(&page.to_string(), &size.to_string()))
            .unwrap();
        let got: Vec<i64> = body.data["item_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["n"].as_i64().unwrap())
            .collect();
        let start = (page - 1) * size;
        let end = (page * size).min(23);
        let expected: Vec<i64> = (start..end).map(|n| n as i64).collect();
        assert_eq!(got, expected, "page={page} pageSize={size}");
        assert_eq!(body.data["total"], 23);
    }

    let beyond = router
        .respond(&Method::GET, "/api/item", &query("100", "10"))
        .unwrap();
    assert!(beyond.data["item_list"].as_array().unwrap().is_empty());

    let fallback = router
        .respond(&Method::GET, "/api/item", &query("-1", "x"))
        .unwrap();
    assert_eq!(fallback.data["item_list"].as_array().unwrap().len(), 10);
    assert_eq!(Pagination::from_query(&query("-1", "x")), Pagination::default());
}

#[test]
fn test_regenerated_entity_replaces_previous_batch() {
    setup_may_runtime();
    let dir = temp_data_dir();
    let store = Arc::new(FileMockStore::open(dir.path()).unwrap());
    let model: Arc<dyn ChatModel> = Arc::new(ScriptedModel::new("user"));
    let generator = EndpointGenerator::new(model);

    let first = generator.generate_endpoint_set("users").unwrap();
    store.save_batch(&first.endpoints).unwrap();
    let second = generator.generate_endpoint_set("users again").unwrap();
    store.save_batch(&second.endpoints).unwrap();

    let mut stored: Vec<MockId> = store.get_all().unwrap().iter().map(|e| e.id).collect();
    let mut newest: Vec<MockId> = second.endpoints.iter().map(|e| e.id).collect();
    stored.sort();
    newest.sort();
    assert_eq!(stored, newest);

    let router = MockRouter::new(Arc::clone(&store) as Arc<dyn MockStore>);
    let list_id = second.endpoints.iter().find(|e| e.is_list()).unwrap().id;
    let matched = router.match_route(&Method::GET, "/api/user").unwrap();
    assert_eq!(matched.endpoint.id, list_id);
}
