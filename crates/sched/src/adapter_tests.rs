// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Adapter stub that only implements per-pid status.
struct SinglePidAdapter {
    known: Mutex<HashMap<String, StatusReport>>,
    status_calls: AtomicUsize,
}

#[async_trait]
impl Scheduler for SinglePidAdapter {
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError> {
        Ok(Submission {
            job_id: spec.job_id,
            pid: "1".to_string(),
            submit_date: String::new(),
            state: JobState::Pending,
        })
    }

    async fn status(&self, pid: &str) -> Result<Option<StatusReport>, SchedulerError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.known.lock().get(pid).cloned())
    }

    async fn cancel(&self, _pid: &str) -> Result<(), SchedulerError> {
        Ok(())
    }
}

fn report(pid: &str, state: JobState) -> StatusReport {
    StatusReport {
        pid: pid.to_string(),
        state,
        status: String::new(),
        exit_code: -1,
        elapsed_time: 0.0,
    }
}

#[tokio::test]
async fn default_batch_loops_per_pid() {
    let adapter = SinglePidAdapter {
        known: Mutex::new(HashMap::from([
            ("1".to_string(), report("1", JobState::Running)),
            ("2".to_string(), report("2", JobState::Success)),
        ])),
        status_calls: AtomicUsize::new(0),
    };

    let pids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let reports = adapter.status_batch(&pids).await.unwrap();

    assert_eq!(adapter.status_calls.load(Ordering::SeqCst), 3);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports["1"].state, JobState::Running);
    // unknown pid is simply absent
    assert!(!reports.contains_key("3"));
}
