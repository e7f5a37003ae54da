// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Common scheduler contract.

use crate::error::SchedulerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sfrest_apps::RuntimeHints;
use sfrest_core::JobState;
use std::collections::HashMap;
use std::path::PathBuf;

/// Everything an adapter needs to run one job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Process-assigned job id; adapters accepting client-chosen names use
    /// it as the workload name.
    pub job_id: String,
    /// Tenancy key of the submitter.
    pub user: String,
    /// Application name.
    pub app: String,
    /// Container image used by the orchestrator and HPC backends.
    pub image: String,
    /// Entrypoint synthesized by the validator.
    pub command: String,
    /// Argument vector synthesized by the validator.
    pub args: Vec<String>,
    /// Server-side per-job directory.
    pub job_dir: PathBuf,
    /// Server-side path of the resolved input file.
    pub data_path: String,
    /// Parallelism hints populated by the validator.
    pub hints: RuntimeHints,
}

impl JobSpec {
    /// Arguments joined into a single shell-style string.
    pub fn arg_string(&self) -> String {
        self.args.join(" ")
    }
}

/// Successful submission handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub job_id: String,
    /// External handle assigned by the backend; empty for the in-process
    /// worker until the subprocess exists.
    pub pid: String,
    pub submit_date: String,
    pub state: JobState,
}

/// One status reply from a backend, already mapped into the common
/// taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub pid: String,
    pub state: JobState,
    pub status: String,
    /// -1 when the backend cannot report one.
    pub exit_code: i32,
    /// Seconds.
    pub elapsed_time: f64,
}

/// Uniform interface over the execution backends.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Dispatch a job. Failure leaves no record behind.
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError>;

    /// Current status of one external handle; `None` when the backend no
    /// longer knows it.
    async fn status(&self, pid: &str) -> Result<Option<StatusReport>, SchedulerError>;

    /// Batched status lookup. Backends without a native batch call fall
    /// back to a per-pid loop; pids the backend does not know are simply
    /// absent from the reply.
    async fn status_batch(
        &self,
        pids: &[String],
    ) -> Result<HashMap<String, StatusReport>, SchedulerError> {
        let mut reports = HashMap::new();
        for pid in pids {
            if let Some(report) = self.status(pid).await? {
                reports.insert(pid.clone(), report);
            }
        }
        Ok(reports)
    }

    /// Request termination. Cancelling an already-terminal job is a no-op,
    /// never a hard error.
    async fn cancel(&self, pid: &str) -> Result<(), SchedulerError>;
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
