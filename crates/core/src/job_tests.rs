// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::state::JobState;
use std::collections::HashMap;

fn sample_record() -> JobRecord {
    let mut inputs = HashMap::new();
    inputs.insert("seedthr".to_string(), serde_json::json!(5.0));
    JobRecord::pending(
        "abc123",
        "",
        "anonymous",
        "caesar",
        "2026-02-01T10:00:00+00:00",
        inputs,
        "file-1",
        "/opt/sfrest/jobs/anonymous",
        "",
        SchedulerKind::Local,
    )
}

#[test]
fn pending_record_defaults() {
    let rec = sample_record();
    assert_eq!(rec.state, JobState::Pending);
    assert_eq!(rec.exit_code, -1);
    assert_eq!(rec.elapsed_time, 0.0);
    assert!(rec.pid.is_empty());
}

#[test]
fn job_dir_and_archive_name() {
    let rec = sample_record();
    assert_eq!(
        rec.job_dir(),
        std::path::PathBuf::from("/opt/sfrest/jobs/anonymous/job_abc123")
    );
    assert_eq!(rec.archive_name(), "job_abc123.tar.gz");
}

#[test]
fn record_serde_roundtrip() {
    let rec = sample_record();
    let json = serde_json::to_string(&rec).unwrap();
    let parsed: JobRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, rec);
}

#[test]
fn missing_optional_fields_default() {
    let json = serde_json::json!({
        "job_id": "j1",
        "user": "anonymous",
        "app": "caesar",
        "submit_date": "2026-02-01T10:00:00+00:00",
        "job_inputs": {},
        "data_inputs": "f1",
        "job_top_dir": "/opt/sfrest/jobs/anonymous",
        "scheduler": "hpc",
        "state": "RUNNING"
    });
    let rec: JobRecord = serde_json::from_value(json).unwrap();
    assert_eq!(rec.exit_code, -1);
    assert_eq!(rec.pid, "");
    assert_eq!(rec.scheduler, SchedulerKind::Hpc);
}

#[test]
fn scheduler_kind_parse() {
    assert_eq!("local".parse::<SchedulerKind>().unwrap(), SchedulerKind::Local);
    assert_eq!(
        "orchestrator".parse::<SchedulerKind>().unwrap(),
        SchedulerKind::Orchestrator
    );
    assert_eq!("hpc".parse::<SchedulerKind>().unwrap(), SchedulerKind::Hpc);
    assert!("celery".parse::<SchedulerKind>().is_err());
}
