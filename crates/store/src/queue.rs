// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent FIFO queue backing the local worker pool.
//!
//! Items survive restarts: they live in the `worker.queue` collection until
//! a worker pops them. Payloads are opaque JSON so the queue does not know
//! the task shape.

use crate::docstore::DocStore;
use crate::error::StoreError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const COLLECTION: &str = "worker.queue";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueueDoc {
    /// Monotonic sequence number establishing FIFO order.
    seq: u64,
    /// Job id, used as the document id and for revocation.
    job_id: String,
    payload: Value,
}

/// FIFO queue with persistent items and in-process pop coordination.
pub struct WorkQueue {
    docs: Arc<DocStore>,
    pop_lock: Mutex<()>,
    next_seq: AtomicU64,
}

impl WorkQueue {
    /// Open the queue, resuming the sequence counter past any persisted
    /// items left over from a previous run.
    pub fn open(docs: Arc<DocStore>) -> Result<Self, StoreError> {
        let mut max_seq = 0u64;
        for doc in docs.list(COLLECTION)? {
            if let Ok(item) = serde_json::from_value::<QueueDoc>(doc) {
                max_seq = max_seq.max(item.seq);
            }
        }
        Ok(Self {
            docs,
            pop_lock: Mutex::new(()),
            next_seq: AtomicU64::new(max_seq + 1),
        })
    }

    /// Append a task payload for the given job.
    pub fn push(&self, job_id: &str, payload: Value) -> Result<(), StoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let doc = QueueDoc { seq, job_id: job_id.to_string(), payload };
        self.docs.put(COLLECTION, job_id, &serde_json::to_value(&doc)?)
    }

    /// Remove and return the oldest queued payload, with its job id.
    pub fn pop(&self) -> Result<Option<(String, Value)>, StoreError> {
        let _guard = self.pop_lock.lock();
        let mut oldest: Option<QueueDoc> = None;
        for doc in self.docs.list(COLLECTION)? {
            if let Ok(item) = serde_json::from_value::<QueueDoc>(doc) {
                let is_older = oldest.as_ref().map(|o| item.seq < o.seq).unwrap_or(true);
                if is_older {
                    oldest = Some(item);
                }
            }
        }
        match oldest {
            Some(item) => {
                self.docs.delete(COLLECTION, &item.job_id)?;
                Ok(Some((item.job_id, item.payload)))
            }
            None => Ok(None),
        }
    }

    /// Revoke a queued task before any worker takes it. Returns whether an
    /// item was removed.
    pub fn revoke(&self, job_id: &str) -> Result<bool, StoreError> {
        let _guard = self.pop_lock.lock();
        self.docs.delete(COLLECTION, job_id)
    }

    /// Whether a task for the given job is still queued.
    pub fn queued(&self, job_id: &str) -> Result<bool, StoreError> {
        Ok(self.docs.get(COLLECTION, job_id)?.is_some())
    }

    /// Number of queued items.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.docs.list(COLLECTION)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
