// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::docstore::DocStore;

fn fixture() -> (tempfile::TempDir, AccountingStore) {
    let dir = tempfile::tempdir().unwrap();
    let docs = Arc::new(DocStore::open(dir.path().join("db")).unwrap());
    (dir, AccountingStore::new(docs))
}

#[test]
fn user_record_upserts() {
    let (_dir, store) = fixture();
    assert!(store.get_user("alice").unwrap().is_none());

    let mut record = AccountingRecord {
        timestamp: "2026-02-01T10:00:00+00:00".to_string(),
        njobs: 3,
        ..Default::default()
    };
    store.upsert_user("alice", &record).unwrap();
    assert_eq!(store.get_user("alice").unwrap().unwrap().njobs, 3);

    // second upsert replaces, not accumulates
    record.njobs = 4;
    store.upsert_user("alice", &record).unwrap();
    assert_eq!(store.get_user("alice").unwrap().unwrap().njobs, 4);
}

#[test]
fn appstats_roundtrip() {
    let (_dir, store) = fixture();
    assert!(store.get_appstats().unwrap().is_none());

    let stats = AppStats {
        timestamp: "2026-02-01T10:00:00+00:00".to_string(),
        nusers: 2,
        njobs: 7,
        ..Default::default()
    };
    store.upsert_appstats(&stats).unwrap();

    let loaded = store.get_appstats().unwrap().unwrap();
    assert_eq!(loaded.nusers, 2);
    assert_eq!(loaded.njobs, 7);
}
