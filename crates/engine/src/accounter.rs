// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accounting aggregator.
//!
//! On its own cadence, walks the per-user directories under the data and
//! job roots for storage sizes, folds per-state job counters and runtime
//! sums out of each user's job collection, upserts the per-user accounting
//! document, and recomputes the global `appstats` record.

use crate::error::EngineError;
use sfrest_core::{AccountingRecord, AppStats, Clock, JobState};
use sfrest_store::{AccountingStore, JobStore};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub struct Accounter<C: Clock> {
    jobs: JobStore,
    accounting: AccountingStore,
    data_root: PathBuf,
    job_root: PathBuf,
    clock: C,
}

impl<C: Clock> Accounter<C> {
    pub fn new(
        jobs: JobStore,
        accounting: AccountingStore,
        data_root: PathBuf,
        job_root: PathBuf,
        clock: C,
    ) -> Self {
        Self { jobs, accounting, data_root, job_root, clock }
    }

    /// Start the ticker. The loop never exits; cycle failures are logged.
    pub fn spawn(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let accounter = Arc::clone(&self);
                // directory walks block; keep them off the runtime threads
                let outcome = tokio::task::spawn_blocking(move || accounter.run_cycle()).await;
                match outcome {
                    Ok(Ok(stats)) => {
                        tracing::info!(nusers = stats.nusers, njobs = stats.njobs, "accounting cycle done")
                    }
                    Ok(Err(e)) => tracing::error!(error = %e, "accounting cycle failed"),
                    Err(e) => tracing::error!(error = %e, "accounting task panicked"),
                }
            }
        })
    }

    /// One aggregation pass. Returns the freshly computed global stats.
    pub fn run_cycle(&self) -> Result<AppStats, EngineError> {
        let timestamp = self.clock.utc_iso();

        // users appear by owning a directory under either root or a job
        // collection in the store
        let mut users: BTreeSet<String> = BTreeSet::new();
        users.extend(subdirectories(&self.data_root));
        users.extend(subdirectories(&self.job_root));
        users.extend(self.jobs.users()?);

        let mut stats = AppStats { timestamp: timestamp.clone(), ..AppStats::default() };

        for user in users {
            let mut record = AccountingRecord {
                timestamp: timestamp.clone(),
                datasize: dir_size_kb(&self.data_root.join(&user)),
                jobsize: dir_size_kb(&self.job_root.join(&user)),
                ..AccountingRecord::default()
            };

            for job in self.jobs.find_many(&user)? {
                record.njobs += 1;
                record.job_runtime += job.elapsed_time;
                match job.state {
                    JobState::Success => {
                        record.njobs_completed += 1;
                        record.job_completed_runtime += job.elapsed_time;
                    }
                    JobState::Failure | JobState::TimedOut | JobState::Canceled => {
                        record.njobs_failed += 1;
                    }
                    JobState::Aborted => record.njobs_aborted += 1,
                    JobState::Running | JobState::Started => record.njobs_running += 1,
                    JobState::Pending => record.njobs_pending += 1,
                    JobState::Unknown => record.njobs_unknown += 1,
                }
            }

            if let Err(e) = self.accounting.upsert_user(&user, &record) {
                tracing::warn!(user, error = %e, "accounting upsert failed");
                continue;
            }
            stats.absorb(&record);
        }

        stats.finalize();
        self.accounting.upsert_appstats(&stats)?;
        Ok(stats)
    }
}

fn subdirectories(root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect()
}

/// Recursive directory size in kB; a missing directory counts as zero.
fn dir_size_kb(dir: &Path) -> f64 {
    fn walk(dir: &Path) -> u64 {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path)
                } else {
                    entry.metadata().map(|m| m.len()).unwrap_or(0)
                }
            })
            .sum()
    }
    walk(dir) as f64 / 1024.0
}

#[cfg(test)]
#[path = "accounter_tests.rs"]
mod tests;
