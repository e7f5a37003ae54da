// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation engine.
//!
//! One long-running ticker merges external scheduler state into the job
//! store. Each cycle issues a single discovery query, buckets the
//! unfinished jobs by backend, and applies status replies as idempotent
//! single-document updates. Locally scheduled jobs are skipped entirely
//! because their worker owns the record. Failures on individual jobs are
//! logged and the cycle proceeds to the next one.

use crate::error::EngineError;
use crate::packager;
use sfrest_core::{JobRecord, SchedulerKind};
use sfrest_sched::{Scheduler, StatusReport};
use sfrest_store::JobStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Bounded fan-out for per-job status reads and packaging, so one slow
/// backend or a large archive never stalls the whole cycle.
const STATUS_POOL: usize = 4;

/// Outcome counters for one reconciliation cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub discovered: usize,
    pub updated: usize,
    pub packaged: usize,
    pub failed: usize,
}

pub struct Reconciler {
    jobs: JobStore,
    schedulers: HashMap<SchedulerKind, Arc<dyn Scheduler>>,
}

impl Reconciler {
    pub fn new(jobs: JobStore, schedulers: HashMap<SchedulerKind, Arc<dyn Scheduler>>) -> Self {
        Self { jobs, schedulers }
    }

    /// Start the ticker. The loop never exits; cycle failures are logged.
    pub fn spawn(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.run_cycle().await {
                    Ok(stats) if stats.discovered > 0 => {
                        tracing::info!(
                            discovered = stats.discovered,
                            updated = stats.updated,
                            packaged = stats.packaged,
                            failed = stats.failed,
                            "reconciliation cycle done"
                        );
                    }
                    Ok(_) => tracing::debug!("no unfinished jobs to reconcile"),
                    Err(e) => tracing::error!(error = %e, "reconciliation cycle failed"),
                }
            }
        })
    }

    /// One full pass over every unfinished job.
    pub async fn run_cycle(&self) -> Result<CycleStats, EngineError> {
        let unfinished = self.jobs.find_unfinished_all_users()?;
        let mut stats = CycleStats { discovered: unfinished.len(), ..CycleStats::default() };

        let mut orchestrator_bucket = Vec::new();
        let mut hpc_bucket = Vec::new();
        for job in unfinished {
            match job.scheduler {
                // the worker owns its own updates
                SchedulerKind::Local => {}
                SchedulerKind::Orchestrator => orchestrator_bucket.push(job),
                SchedulerKind::Hpc => hpc_bucket.push(job),
            }
        }

        self.reconcile_orchestrator(orchestrator_bucket, &mut stats).await;
        self.reconcile_hpc(hpc_bucket, &mut stats).await;
        Ok(stats)
    }

    /// Per-job status reads, fanned out on a bounded pool.
    async fn reconcile_orchestrator(&self, bucket: Vec<JobRecord>, stats: &mut CycleStats) {
        let Some(scheduler) = self.schedulers.get(&SchedulerKind::Orchestrator) else {
            if !bucket.is_empty() {
                tracing::warn!(jobs = bucket.len(), "no orchestrator adapter configured");
            }
            return;
        };

        let semaphore = Arc::new(Semaphore::new(STATUS_POOL));
        let mut tasks = tokio::task::JoinSet::new();
        for job in bucket {
            let scheduler = Arc::clone(scheduler);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return (job, Err(sfrest_sched::SchedulerError::Cancel(
                        "status pool closed".to_string(),
                    )));
                };
                // the workload name is the job id for this backend
                let reply = scheduler.status(&job.job_id).await;
                (job, reply)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((job, reply)) = joined else { continue };
            match reply {
                Ok(Some(report)) => self.apply_report(&job, &report, stats).await,
                Ok(None) => {
                    tracing::debug!(job_id = %job.job_id, "workload unknown to orchestrator, retrying next cycle");
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(job_id = %job.job_id, error = %e, "orchestrator status failed");
                }
            }
        }
    }

    /// One batched status call covers the whole bucket; pids missing from
    /// the reply are left for the next cycle (the remote cluster may have
    /// cleared them).
    async fn reconcile_hpc(&self, bucket: Vec<JobRecord>, stats: &mut CycleStats) {
        if bucket.is_empty() {
            return;
        }
        let Some(scheduler) = self.schedulers.get(&SchedulerKind::Hpc) else {
            tracing::warn!(jobs = bucket.len(), "no HPC adapter configured");
            return;
        };

        let pids: Vec<String> =
            bucket.iter().map(|j| j.pid.clone()).filter(|p| !p.is_empty()).collect();
        tracing::info!(queried = pids.len(), total = bucket.len(), "batch-querying cluster jobs");

        let reports = match scheduler.status_batch(&pids).await {
            Ok(reports) => reports,
            Err(e) => {
                stats.failed += bucket.len();
                tracing::warn!(error = %e, "batched cluster status failed");
                return;
            }
        };

        for job in &bucket {
            match reports.get(&job.pid) {
                Some(report) => self.apply_report(job, report, stats).await,
                None => {
                    tracing::debug!(job_id = %job.job_id, pid = %job.pid, "pid absent from batch reply, leaving unchanged");
                }
            }
        }
    }

    /// Merge one status reply into the persisted record. Terminal
    /// transitions package the output first (idempotent, guarded by the
    /// archive's prior existence) and then garbage-collect orchestrator
    /// workloads best-effort.
    async fn apply_report(&self, job: &JobRecord, report: &StatusReport, stats: &mut CycleStats) {
        if report.state.is_terminal() {
            let record = job.clone();
            let packaged =
                tokio::task::spawn_blocking(move || packager::package_job(&record)).await;
            match packaged {
                Ok(Ok(_)) => stats.packaged += 1,
                Ok(Err(EngineError::MissingJobDir(dir))) => {
                    tracing::warn!(job_id = %job.job_id, dir = %dir.display(), "no job directory to package");
                }
                Ok(Err(e)) => {
                    tracing::error!(job_id = %job.job_id, error = %e, "packaging failed");
                }
                Err(e) => {
                    tracing::error!(job_id = %job.job_id, error = %e, "packaging task panicked");
                }
            }
        }

        let exit_code = if report.exit_code == -1 { None } else { Some(report.exit_code) };
        match self.jobs.update_status(
            &job.user,
            &job.job_id,
            report.state,
            &report.status,
            exit_code,
            Some(report.elapsed_time),
        ) {
            Ok(true) => {
                stats.updated += 1;
                tracing::info!(job_id = %job.job_id, state = %report.state, "job state updated");
            }
            Ok(false) => {
                tracing::debug!(job_id = %job.job_id, "update dropped by terminal guard");
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(job_id = %job.job_id, error = %e, "job store update failed");
            }
        }

        if report.state.is_terminal() && job.scheduler == SchedulerKind::Orchestrator {
            if let Some(scheduler) = self.schedulers.get(&SchedulerKind::Orchestrator) {
                if let Err(e) = scheduler.cancel(&job.job_id).await {
                    tracing::warn!(job_id = %job.job_id, error = %e, "workload cleanup failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
