// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::docstore::DocStore;

fn fixture() -> (tempfile::TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let docs = Arc::new(DocStore::open(dir.path().join("db")).unwrap());
    (dir, FileStore::new(docs))
}

fn record(fileid: &str) -> FileRecord {
    FileRecord {
        fileid: fileid.to_string(),
        filepath: format!("/opt/sfrest/data/alice/{}.fits", fileid),
        filename_orig: "galaxy.fits".to_string(),
        fileext: "fits".to_string(),
        filesize: 2.5,
        filedate: "2026-02-01T09:00:00+00:00".to_string(),
        tag: "survey".to_string(),
    }
}

#[test]
fn register_then_resolve() {
    let (_dir, store) = fixture();
    store.register("alice", &record("f1")).unwrap();

    let found = store.resolve("alice", "f1").unwrap().unwrap();
    assert_eq!(found.filepath, "/opt/sfrest/data/alice/f1.fits");
    assert!(store.resolve("bob", "f1").unwrap().is_none());
}

#[test]
fn listing_strips_server_paths() {
    let (_dir, store) = fixture();
    store.register("alice", &record("f1")).unwrap();

    let listed = store.list_public("alice").unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].get("filepath").is_none());
    assert_eq!(listed[0]["fileid"], "f1");
    assert_eq!(listed[0]["filename_orig"], "galaxy.fits");
}

#[test]
fn remove_returns_record_once() {
    let (_dir, store) = fixture();
    store.register("alice", &record("f1")).unwrap();

    let removed = store.remove("alice", "f1").unwrap();
    assert!(removed.is_some());
    assert!(store.remove("alice", "f1").unwrap().is_none());
    assert!(store.resolve("alice", "f1").unwrap().is_none());
}
