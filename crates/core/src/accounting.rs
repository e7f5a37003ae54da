// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-user accounting and global service statistics.

use serde::{Deserialize, Serialize};

/// Resource-consumption summary for one user, upserted into the
/// `<user>.accounting` collection on every aggregator cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountingRecord {
    /// Aggregation instant, ISO-8601 UTC.
    pub timestamp: String,
    /// Recursive size of the user's data directory, in kB.
    #[serde(default)]
    pub datasize: f64,
    /// Recursive size of the user's job directory, in kB.
    #[serde(default)]
    pub jobsize: f64,
    #[serde(default)]
    pub njobs: u64,
    #[serde(default)]
    pub njobs_completed: u64,
    #[serde(default)]
    pub njobs_failed: u64,
    #[serde(default)]
    pub njobs_aborted: u64,
    #[serde(default)]
    pub njobs_pending: u64,
    #[serde(default)]
    pub njobs_running: u64,
    #[serde(default)]
    pub njobs_unknown: u64,
    /// Sum of elapsed_time across all jobs, seconds.
    #[serde(default)]
    pub job_runtime: f64,
    /// Sum of elapsed_time across SUCCESS jobs only, seconds.
    #[serde(default)]
    pub job_completed_runtime: f64,
}

/// Global statistics aggregated across all users (`appstats` collection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppStats {
    pub timestamp: String,
    pub nusers: u64,
    #[serde(default)]
    pub datasize: f64,
    #[serde(default)]
    pub jobsize: f64,
    #[serde(default)]
    pub totsize: f64,
    #[serde(default)]
    pub njobs: u64,
    #[serde(default)]
    pub njobs_completed: u64,
    #[serde(default)]
    pub njobs_failed: u64,
    #[serde(default)]
    pub njobs_aborted: u64,
    #[serde(default)]
    pub njobs_pending: u64,
    #[serde(default)]
    pub njobs_running: u64,
    #[serde(default)]
    pub njobs_unknown: u64,
    #[serde(default)]
    pub job_runtime: f64,
    #[serde(default)]
    pub job_completed_runtime: f64,
    /// `job_completed_runtime / njobs_completed` when the denominator is
    /// positive, else 0.
    #[serde(default)]
    pub avg_completed_job_runtime: f64,
}

impl AppStats {
    /// Fold one user's record into the global totals.
    pub fn absorb(&mut self, user: &AccountingRecord) {
        self.nusers += 1;
        self.datasize += user.datasize;
        self.jobsize += user.jobsize;
        self.totsize += user.datasize + user.jobsize;
        self.njobs += user.njobs;
        self.njobs_completed += user.njobs_completed;
        self.njobs_failed += user.njobs_failed;
        self.njobs_aborted += user.njobs_aborted;
        self.njobs_pending += user.njobs_pending;
        self.njobs_running += user.njobs_running;
        self.njobs_unknown += user.njobs_unknown;
        self.job_runtime += user.job_runtime;
        self.job_completed_runtime += user.job_completed_runtime;
    }

    /// Recompute the mean completed-job runtime after all users are folded.
    pub fn finalize(&mut self) {
        self.avg_completed_job_runtime = if self.njobs_completed > 0 {
            self.job_completed_runtime / self.njobs_completed as f64
        } else {
            0.0
        };
    }
}

#[cfg(test)]
#[path = "accounting_tests.rs"]
mod tests;
