// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn store() -> (tempfile::TempDir, DocStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DocStore::open(dir.path().join("db")).unwrap();
    (dir, store)
}

#[test]
fn put_then_get_roundtrips() {
    let (_dir, store) = store();
    let doc = json!({ "job_id": "j1", "state": "PENDING" });
    store.put("anonymous.jobs", "j1", &doc).unwrap();
    assert_eq!(store.get("anonymous.jobs", "j1").unwrap(), Some(doc));
}

#[test]
fn get_missing_is_none() {
    let (_dir, store) = store();
    assert_eq!(store.get("anonymous.jobs", "nope").unwrap(), None);
}

#[test]
fn update_merges_named_fields_only() {
    let (_dir, store) = store();
    store
        .put("u.jobs", "j1", &json!({ "state": "PENDING", "status": "queued", "pid": "" }))
        .unwrap();

    let mut fields = serde_json::Map::new();
    fields.insert("state".to_string(), json!("RUNNING"));
    let written = store.update("u.jobs", "j1", &fields, false).unwrap();
    assert!(written);

    let doc = store.get("u.jobs", "j1").unwrap().unwrap();
    assert_eq!(doc["state"], "RUNNING");
    // untouched fields survive
    assert_eq!(doc["status"], "queued");
    assert_eq!(doc["pid"], "");
}

#[test]
fn update_missing_without_upsert_errors() {
    let (_dir, store) = store();
    let fields = serde_json::Map::new();
    let err = store.update("u.jobs", "ghost", &fields, false).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn update_missing_with_upsert_creates() {
    let (_dir, store) = store();
    let mut fields = serde_json::Map::new();
    fields.insert("datasize".to_string(), json!(10.0));
    let written = store.update("u.accounting", "current", &fields, true).unwrap();
    assert!(written);
    assert_eq!(
        store.get("u.accounting", "current").unwrap().unwrap()["datasize"],
        10.0
    );
}

#[test]
fn delete_reports_existence() {
    let (_dir, store) = store();
    store.put("u.files", "f1", &json!({})).unwrap();
    assert!(store.delete("u.files", "f1").unwrap());
    assert!(!store.delete("u.files", "f1").unwrap());
}

#[test]
fn list_missing_collection_is_empty() {
    let (_dir, store) = store();
    assert!(store.list("nobody.jobs").unwrap().is_empty());
}

#[test]
fn list_skips_torn_documents() {
    let (_dir, store) = store();
    store.put("u.jobs", "good", &json!({ "ok": true })).unwrap();
    std::fs::write(store.root().join("u.jobs").join("torn.json"), b"{not json").unwrap();

    let docs = store.list("u.jobs").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["ok"], true);
}

#[test]
fn collections_with_suffix_filters() {
    let (_dir, store) = store();
    store.put("alice.jobs", "j1", &json!({})).unwrap();
    store.put("bob.jobs", "j1", &json!({})).unwrap();
    store.put("alice.files", "f1", &json!({})).unwrap();

    let jobs = store.collections_with_suffix(".jobs").unwrap();
    assert_eq!(jobs, vec!["alice.jobs", "bob.jobs"]);
}

#[test]
fn rejects_path_traversal_ids() {
    let (_dir, store) = store();
    assert!(matches!(
        store.put("u.jobs", "../evil", &json!({})).unwrap_err(),
        StoreError::InvalidDocId(_)
    ));
    assert!(matches!(
        store.put("../evil", "x", &json!({})).unwrap_err(),
        StoreError::InvalidCollection(_)
    ));
}
