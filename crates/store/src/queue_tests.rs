// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn fixture() -> (tempfile::TempDir, Arc<DocStore>) {
    let dir = tempfile::tempdir().unwrap();
    let docs = Arc::new(DocStore::open(dir.path().join("db")).unwrap());
    (dir, docs)
}

#[test]
fn pops_in_fifo_order() {
    let (_dir, docs) = fixture();
    let queue = WorkQueue::open(docs).unwrap();

    queue.push("j1", json!({ "cmd": "a" })).unwrap();
    queue.push("j2", json!({ "cmd": "b" })).unwrap();
    queue.push("j3", json!({ "cmd": "c" })).unwrap();

    assert_eq!(queue.len().unwrap(), 3);
    assert_eq!(queue.pop().unwrap().unwrap().0, "j1");
    assert_eq!(queue.pop().unwrap().unwrap().0, "j2");
    assert_eq!(queue.pop().unwrap().unwrap().0, "j3");
    assert!(queue.pop().unwrap().is_none());
}

#[test]
fn revoke_removes_queued_item() {
    let (_dir, docs) = fixture();
    let queue = WorkQueue::open(docs).unwrap();

    queue.push("j1", json!({})).unwrap();
    queue.push("j2", json!({})).unwrap();

    assert!(queue.revoke("j1").unwrap());
    assert!(!queue.revoke("j1").unwrap());
    assert_eq!(queue.pop().unwrap().unwrap().0, "j2");
}

#[test]
fn items_survive_reopen() {
    let (_dir, docs) = fixture();
    {
        let queue = WorkQueue::open(docs.clone()).unwrap();
        queue.push("j1", json!({ "cmd": "a" })).unwrap();
        queue.push("j2", json!({ "cmd": "b" })).unwrap();
    }

    // A new queue over the same store resumes where the old one stopped.
    let queue = WorkQueue::open(docs).unwrap();
    assert_eq!(queue.len().unwrap(), 2);
    queue.push("j3", json!({ "cmd": "c" })).unwrap();
    assert_eq!(queue.pop().unwrap().unwrap().0, "j1");
    assert_eq!(queue.pop().unwrap().unwrap().0, "j2");
    assert_eq!(queue.pop().unwrap().unwrap().0, "j3");
}

#[test]
fn payload_is_preserved() {
    let (_dir, docs) = fixture();
    let queue = WorkQueue::open(docs).unwrap();

    let payload = json!({ "command": "SFinderSubmitter.sh", "args": ["--run"] });
    queue.push("j1", payload.clone()).unwrap();

    let (_, popped) = queue.pop().unwrap().unwrap();
    assert_eq!(popped, payload);
}
