// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process worker pool executing jobs as local subprocesses.
//!
//! Submission enqueues a task on the persistent FIFO queue; N workers
//! dequeue and each runs one subprocess at a time in a fresh process group
//! so the whole tree can be signalled. This is the only adapter that owns
//! its job records end-to-end: every state transition is written to the
//! job store by the worker itself, and the reconciliation engine leaves
//! the local bucket alone.

mod worker;

pub use worker::QueuedTask;

use crate::adapter::{JobSpec, Scheduler, StatusReport, Submission};
use crate::error::SchedulerError;
use async_trait::async_trait;
use parking_lot::Mutex;
use sfrest_core::{Clock, Config, JobState, SystemClock};
use sfrest_store::{JobStore, WorkQueue};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Handle on a subprocess currently owned by a worker.
#[derive(Debug, Clone)]
struct RunningJob {
    /// Process-group id (equals the child pid, spawned with pgid 0).
    pgid: i32,
    started: Instant,
}

pub struct LocalWorkerAdapter {
    queue: Arc<WorkQueue>,
    jobs: JobStore,
    clock: SystemClock,
    monitor_period: Duration,
    soft_time_limit: Duration,
    running: Mutex<HashMap<String, RunningJob>>,
}

impl LocalWorkerAdapter {
    pub fn new(queue: Arc<WorkQueue>, jobs: JobStore, config: &Config) -> Self {
        Self {
            queue,
            jobs,
            clock: SystemClock,
            monitor_period: Duration::from_secs(config.monitor_period_sec.max(1)),
            soft_time_limit: Duration::from_secs(config.job_soft_time_limit_sec),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Start `count` worker tasks consuming the queue.
    pub fn spawn_workers(self: &Arc<Self>, count: usize) -> Vec<tokio::task::JoinHandle<()>> {
        (0..count)
            .map(|index| {
                let adapter = Arc::clone(self);
                tokio::spawn(async move { worker::worker_loop(adapter, index).await })
            })
            .collect()
    }

    pub(crate) fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    pub(crate) fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub(crate) fn monitor_period(&self) -> Duration {
        self.monitor_period
    }

    pub(crate) fn soft_time_limit(&self) -> Duration {
        self.soft_time_limit
    }

    pub(crate) fn register_running(&self, job_id: &str, pgid: i32) {
        self.running
            .lock()
            .insert(job_id.to_string(), RunningJob { pgid, started: Instant::now() });
    }

    pub(crate) fn deregister_running(&self, job_id: &str) {
        self.running.lock().remove(job_id);
    }

    fn running_info(&self, job_id: &str) -> Option<RunningJob> {
        self.running.lock().get(job_id).cloned()
    }
}

#[async_trait]
impl Scheduler for LocalWorkerAdapter {
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError> {
        let task = QueuedTask {
            user: spec.user.clone(),
            job_id: spec.job_id.clone(),
            command: spec.command.clone(),
            args: spec.args.clone(),
            job_dir: spec.job_dir.clone(),
        };
        self.queue.push(&spec.job_id, serde_json::to_value(&task).map_err(|e| {
            SchedulerError::Dispatch(format!("failed to encode task: {}", e))
        })?)?;
        tracing::info!(job_id = %spec.job_id, user = %spec.user, "task enqueued");

        Ok(Submission {
            job_id: spec.job_id,
            // The OS pid only exists once a worker forks the subprocess.
            pid: String::new(),
            submit_date: self.clock.utc_iso(),
            state: JobState::Pending,
        })
    }

    /// The job store is authoritative for local jobs; this only answers
    /// from what the adapter currently holds (queued or executing).
    async fn status(&self, job_id: &str) -> Result<Option<StatusReport>, SchedulerError> {
        if let Some(info) = self.running_info(job_id) {
            return Ok(Some(StatusReport {
                pid: info.pgid.to_string(),
                state: JobState::Running,
                status: "Task running in background".to_string(),
                exit_code: -1,
                elapsed_time: info.started.elapsed().as_secs_f64(),
            }));
        }
        if self.queue.queued(job_id)? {
            return Ok(Some(StatusReport {
                pid: String::new(),
                state: JobState::Pending,
                status: "Task pending to be executed".to_string(),
                exit_code: -1,
                elapsed_time: 0.0,
            }));
        }
        Ok(None)
    }

    /// Revoke the queued task, or kill the process group when already
    /// executing. The caller marks the record CANCELED; a late FAILURE
    /// write from the worker bounces off the terminal-state guard.
    async fn cancel(&self, job_id: &str) -> Result<(), SchedulerError> {
        if self.queue.revoke(job_id)? {
            tracing::info!(job_id, "revoked queued task");
            return Ok(());
        }
        if let Some(info) = self.running_info(job_id) {
            tracing::info!(job_id, pgid = info.pgid, "killing process group");
            worker::kill_group(info.pgid);
            return Ok(());
        }
        // Already finished: cancel-after-terminal is a no-op.
        tracing::debug!(job_id, "cancel requested for task no longer held");
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
