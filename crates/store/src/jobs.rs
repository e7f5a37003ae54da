// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record persistence.

use crate::docstore::DocStore;
use crate::error::StoreError;
use serde_json::{json, Map, Value};
use sfrest_core::{JobRecord, JobState};
use std::sync::Arc;

/// Store of per-user job collections (`<user>.jobs`).
///
/// Owns every job record exclusively: adapters and the reconciliation
/// engine read records and request updates but never cache mutable copies
/// beyond a single poll cycle.
#[derive(Clone)]
pub struct JobStore {
    docs: Arc<DocStore>,
}

impl JobStore {
    pub fn new(docs: Arc<DocStore>) -> Self {
        Self { docs }
    }

    fn collection(user: &str) -> String {
        format!("{}.jobs", user)
    }

    /// Insert a fresh record keyed by `(user, job_id)`.
    pub fn insert(&self, record: &JobRecord) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.docs.put(&Self::collection(&record.user), &record.job_id, &doc)
    }

    /// Merge the named fields into a job record.
    ///
    /// Terminal records accept no further state transition: an update that
    /// would move a terminal job to a different state is dropped whole
    /// (returns `Ok(false)`). Re-writing the same terminal state is allowed
    /// and idempotent, which is what makes reconciliation safe to repeat.
    pub fn update(
        &self,
        user: &str,
        job_id: &str,
        fields: &Map<String, Value>,
        upsert: bool,
    ) -> Result<bool, StoreError> {
        if let Some(current) = self.find_one(user, job_id)? {
            if current.state.is_terminal() {
                let requested = fields.get("state").and_then(Value::as_str);
                if let Some(requested) = requested {
                    if requested != current.state.as_str() {
                        tracing::debug!(
                            job_id,
                            current = %current.state,
                            requested,
                            "dropping state transition on terminal job"
                        );
                        return Ok(false);
                    }
                }
            }
        }
        self.docs.update(&Self::collection(user), job_id, fields, upsert)
    }

    /// Convenience for the common status-update shape written by workers
    /// and the reconciliation engine.
    pub fn update_status(
        &self,
        user: &str,
        job_id: &str,
        state: JobState,
        status: &str,
        exit_code: Option<i32>,
        elapsed_time: Option<f64>,
    ) -> Result<bool, StoreError> {
        let mut fields = Map::new();
        fields.insert("state".to_string(), json!(state));
        fields.insert("status".to_string(), json!(status));
        if let Some(code) = exit_code {
            fields.insert("exit_code".to_string(), json!(code));
        }
        if let Some(elapsed) = elapsed_time {
            fields.insert("elapsed_time".to_string(), json!(elapsed));
        }
        self.update(user, job_id, &fields, false)
    }

    /// Record the adapter-assigned external handle. Assigned at most once;
    /// a second write with a different pid is refused.
    pub fn assign_pid(&self, user: &str, job_id: &str, pid: &str) -> Result<bool, StoreError> {
        if let Some(current) = self.find_one(user, job_id)? {
            if !current.pid.is_empty() && current.pid != pid {
                tracing::warn!(job_id, current = %current.pid, pid, "refusing pid reassignment");
                return Ok(false);
            }
        }
        let mut fields = Map::new();
        fields.insert("pid".to_string(), json!(pid));
        self.docs.update(&Self::collection(user), job_id, &fields, false)
    }

    pub fn find_one(&self, user: &str, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        match self.docs.get(&Self::collection(user), job_id)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// All job records of one user.
    pub fn find_many(&self, user: &str) -> Result<Vec<JobRecord>, StoreError> {
        let docs = self.docs.list(&Self::collection(user))?;
        Ok(decode_records(docs))
    }

    /// Single discovery query: every unfinished job across every user
    /// partition.
    pub fn find_unfinished_all_users(&self) -> Result<Vec<JobRecord>, StoreError> {
        let mut unfinished = Vec::new();
        for collection in self.docs.collections_with_suffix(".jobs")? {
            let docs = self.docs.list(&collection)?;
            unfinished.extend(
                decode_records(docs).into_iter().filter(|r| r.state.is_unfinished()),
            );
        }
        Ok(unfinished)
    }

    /// Users that have a job collection.
    pub fn users(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .docs
            .collections_with_suffix(".jobs")?
            .into_iter()
            .filter_map(|c| c.strip_suffix(".jobs").map(str::to_string))
            .collect())
    }
}

fn decode_records(docs: Vec<Value>) -> Vec<JobRecord> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<JobRecord>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable job record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
