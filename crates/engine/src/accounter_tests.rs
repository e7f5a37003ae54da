// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sfrest_core::{FakeClock, JobRecord, SchedulerKind};
use sfrest_store::DocStore;
use std::collections::HashMap;

struct Fixture {
    _dir: tempfile::TempDir,
    jobs: JobStore,
    accounting: AccountingStore,
    data_root: PathBuf,
    job_root: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let docs = Arc::new(DocStore::open(dir.path().join("db")).unwrap());
    let data_root = dir.path().join("data");
    let job_root = dir.path().join("jobs");
    std::fs::create_dir_all(&data_root).unwrap();
    std::fs::create_dir_all(&job_root).unwrap();
    Fixture {
        jobs: JobStore::new(docs.clone()),
        accounting: AccountingStore::new(docs),
        data_root,
        job_root,
        _dir: dir,
    }
}

fn accounter(fixture: &Fixture) -> Accounter<FakeClock> {
    Accounter::new(
        fixture.jobs.clone(),
        fixture.accounting.clone(),
        fixture.data_root.clone(),
        fixture.job_root.clone(),
        FakeClock::new(),
    )
}

fn insert_job(fixture: &Fixture, user: &str, job_id: &str, state: JobState, elapsed: f64) {
    let mut record = JobRecord::pending(
        job_id,
        "",
        user,
        "caesar",
        "2026-02-01T10:00:00+00:00",
        HashMap::new(),
        "f1",
        fixture.job_root.join(user).display().to_string(),
        "",
        SchedulerKind::Local,
    );
    record.state = state;
    record.elapsed_time = elapsed;
    fixture.jobs.insert(&record).unwrap();
}

#[test]
fn aggregates_per_user_storage_and_job_stats() {
    let fixture = fixture();

    // 2048 bytes of data for alice, nested
    let alice_data = fixture.data_root.join("alice/sub");
    std::fs::create_dir_all(&alice_data).unwrap();
    std::fs::write(alice_data.join("img.fits"), vec![0u8; 2048]).unwrap();

    insert_job(&fixture, "alice", "j1", JobState::Success, 60.0);
    insert_job(&fixture, "alice", "j2", JobState::Failure, 10.0);
    insert_job(&fixture, "alice", "j3", JobState::Pending, 0.0);

    let stats = accounter(&fixture).run_cycle().unwrap();

    let record = fixture.accounting.get_user("alice").unwrap().unwrap();
    assert_eq!(record.datasize, 2.0);
    assert_eq!(record.njobs, 3);
    assert_eq!(record.njobs_completed, 1);
    assert_eq!(record.njobs_failed, 1);
    assert_eq!(record.njobs_pending, 1);
    assert_eq!(record.job_runtime, 70.0);
    // only SUCCESS jobs feed the completed runtime
    assert_eq!(record.job_completed_runtime, 60.0);

    assert_eq!(stats.nusers, 1);
    assert_eq!(stats.njobs, 3);
    assert_eq!(stats.avg_completed_job_runtime, 60.0);
}

#[test]
fn global_stats_sum_across_users() {
    let fixture = fixture();
    insert_job(&fixture, "alice", "j1", JobState::Success, 30.0);
    insert_job(&fixture, "bob", "j2", JobState::Success, 90.0);

    let stats = accounter(&fixture).run_cycle().unwrap();

    assert_eq!(stats.nusers, 2);
    assert_eq!(stats.njobs_completed, 2);
    assert_eq!(stats.job_completed_runtime, 120.0);
    assert_eq!(stats.avg_completed_job_runtime, 60.0);

    let persisted = fixture.accounting.get_appstats().unwrap().unwrap();
    assert_eq!(persisted.njobs_completed, 2);
}

#[test]
fn mean_runtime_is_zero_without_completed_jobs() {
    let fixture = fixture();
    insert_job(&fixture, "alice", "j1", JobState::Failure, 30.0);

    let stats = accounter(&fixture).run_cycle().unwrap();
    assert_eq!(stats.avg_completed_job_runtime, 0.0);
}

#[test]
fn users_with_only_directories_still_get_records() {
    let fixture = fixture();
    std::fs::create_dir_all(fixture.data_root.join("carol")).unwrap();

    accounter(&fixture).run_cycle().unwrap();

    let record = fixture.accounting.get_user("carol").unwrap().unwrap();
    assert_eq!(record.njobs, 0);
    assert_eq!(record.datasize, 0.0);
}

#[test]
fn missing_roots_produce_empty_stats() {
    let fixture = fixture();
    std::fs::remove_dir_all(&fixture.data_root).unwrap();
    std::fs::remove_dir_all(&fixture.job_root).unwrap();

    let stats = accounter(&fixture).run_cycle().unwrap();
    assert_eq!(stats.nusers, 0);
}
