// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted job record and scheduler kind.

use crate::state::JobState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Which execution backend a job was dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// In-process worker pool running subprocesses on this host.
    Local,
    /// Container orchestrator (one batch workload per job).
    Orchestrator,
    /// HPC batch cluster behind a token-protected REST endpoint.
    Hpc,
}

impl SchedulerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerKind::Local => "local",
            SchedulerKind::Orchestrator => "orchestrator",
            SchedulerKind::Hpc => "hpc",
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchedulerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(SchedulerKind::Local),
            "orchestrator" => Ok(SchedulerKind::Orchestrator),
            "hpc" => Ok(SchedulerKind::Hpc),
            other => Err(format!("unknown scheduler kind '{}'", other)),
        }
    }
}

/// A job record as stored in the per-user `<user>.jobs` collection.
///
/// Created by the submission controller in `Pending`; mutated afterwards
/// only by the reconciliation engine or, for locally scheduled jobs, by the
/// worker that owns the subprocess. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Process-assigned identifier, unique per user.
    pub job_id: String,
    /// External handle assigned by the scheduler (workload name, cluster-side
    /// numeric id). Empty for the in-process worker until the subprocess
    /// exists. Assigned at most once.
    #[serde(default)]
    pub pid: String,
    /// Tenancy key (sanitized user identity).
    pub user: String,
    /// Application name the job runs.
    pub app: String,
    /// UTC submission instant, ISO-8601.
    pub submit_date: String,
    /// Validated parameter map exactly as accepted by the validator.
    pub job_inputs: HashMap<String, Value>,
    /// File handle id resolved at submission.
    pub data_inputs: String,
    /// Per-user job root (`<job-root>/<user>`); the job directory itself is
    /// `job_<job_id>` underneath it.
    pub job_top_dir: String,
    /// User-supplied free-form tag.
    #[serde(default)]
    pub tag: String,
    /// Backend the job was dispatched to.
    pub scheduler: SchedulerKind,
    pub state: JobState,
    /// Human-readable status message.
    #[serde(default)]
    pub status: String,
    /// Exit code of the underlying process; -1 when unknown.
    #[serde(default = "default_exit_code")]
    pub exit_code: i32,
    /// Cumulative runtime in seconds.
    #[serde(default)]
    pub elapsed_time: f64,
}

fn default_exit_code() -> i32 {
    -1
}

impl JobRecord {
    /// Create a fresh record in `Pending` with unknown exit code.
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        job_id: impl Into<String>,
        pid: impl Into<String>,
        user: impl Into<String>,
        app: impl Into<String>,
        submit_date: impl Into<String>,
        job_inputs: HashMap<String, Value>,
        data_inputs: impl Into<String>,
        job_top_dir: impl Into<String>,
        tag: impl Into<String>,
        scheduler: SchedulerKind,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            pid: pid.into(),
            user: user.into(),
            app: app.into(),
            submit_date: submit_date.into(),
            job_inputs,
            data_inputs: data_inputs.into(),
            job_top_dir: job_top_dir.into(),
            tag: tag.into(),
            scheduler,
            state: JobState::Pending,
            status: "Job queued and waiting to be processed".to_string(),
            exit_code: -1,
            elapsed_time: 0.0,
        }
    }

    /// Directory holding this job's work files.
    pub fn job_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.job_top_dir).join(format!("job_{}", self.job_id))
    }

    /// Name of the output archive inside the job directory.
    pub fn archive_name(&self) -> String {
        format!("job_{}.tar.gz", self.job_id)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
