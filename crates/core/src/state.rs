// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state lattice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a job as tracked in the job store.
///
/// Transitions flow `Pending → Started → Running` and then into one of the
/// terminal states. `Aborted` is reached when a job dies before the
/// scheduler ever ran it; `Unknown` is what an adapter reports when the
/// backend returns a state outside the common taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "STARTED")]
    Started,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(rename = "CANCELED")]
    Canceled,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl JobState {
    /// Terminal states may only be re-written by idempotent packaging
    /// updates; the reconciler never moves a job out of them.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Success | JobState::Failure | JobState::TimedOut | JobState::Canceled
        )
    }

    /// Unfinished jobs are the ones the reconciliation engine polls.
    pub fn is_unfinished(self) -> bool {
        matches!(self, JobState::Pending | JobState::Started | JobState::Running)
    }

    /// Wire spelling, identical to the serde rename.
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Started => "STARTED",
            JobState::Running => "RUNNING",
            JobState::Success => "SUCCESS",
            JobState::Failure => "FAILURE",
            JobState::TimedOut => "TIMED-OUT",
            JobState::Canceled => "CANCELED",
            JobState::Aborted => "ABORTED",
            JobState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
