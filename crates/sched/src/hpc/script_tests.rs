// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn params() -> BatchScript {
    BatchScript {
        name: "ab12cd".to_string(),
        image: "sriggi/caesar-job:latest".to_string(),
        arg_string: "--run --seedthr=5.0".to_string(),
        cluster_job_dir: "/mnt/storage/jobs/alice/job_ab12cd".to_string(),
        cluster_data_path: "/mnt/storage/data/alice/f1.fits".to_string(),
        mount_settle_sec: 5,
        tasks: 1,
        cpus_per_task: 2,
    }
}

#[test]
fn script_sleeps_before_starting() {
    let script = build_script(&params());
    assert!(script.starts_with("#!/bin/bash\nsleep 5\n"));
}

#[test]
fn script_skips_sleep_when_disabled() {
    let mut p = params();
    p.mount_settle_sec = 0;
    let script = build_script(&p);
    assert!(!script.contains("sleep"));
}

#[test]
fn script_binds_cluster_paths_and_exports_options() {
    let script = build_script(&params());
    assert!(script.contains("-B /mnt/storage/jobs/alice/job_ab12cd"));
    assert!(script.contains("-B /mnt/storage/data/alice/f1.fits"));
    assert!(script.contains("--env JOB_OPTIONS='--run --seedthr=5.0'"));
    assert!(script.contains("sriggi/caesar-job:latest"));
}

#[test]
fn single_process_runs_without_mpi() {
    let script = build_script(&params());
    assert!(!script.contains("mpirun"));
}

#[test]
fn multi_process_wraps_in_mpi_with_task_topology() {
    let mut p = params();
    p.tasks = 4;
    p.cpus_per_task = 2;
    let script = build_script(&p);
    assert!(script.contains("mpirun -np 8 singularity run"));
}

#[parameterized(
    within = { 4, 32, 4 },
    at_max = { 32, 32, 32 },
    above_max = { 64, 32, 1 },
    zero = { 0, 32, 1 },
)]
fn clamp_downscales_over_max_to_one(value: u32, max: u32, expected: u32) {
    assert_eq!(clamp_to_max(value, max), expected);
}

#[test]
fn job_body_carries_partition_and_workdir() {
    let body = build_job_body(&params(), "normal", "/home/cirasa");
    assert_eq!(body["job"]["name"], "ab12cd");
    assert_eq!(body["job"]["partition"], "normal");
    assert_eq!(body["job"]["current_working_directory"], "/home/cirasa");
    assert_eq!(body["job"]["tasks"], 1);
    assert_eq!(body["job"]["cpus_per_task"], 2);
    // required by the endpoint even though the docs say otherwise
    assert_eq!(body["job"]["environment"]["PATH"], "/bin:/usr/bin/:/usr/local/bin/");
    assert!(body["script"].as_str().unwrap().starts_with("#!/bin/bash"));
}

#[parameterized(
    pending = { "PENDING", JobState::Pending },
    suspended = { "SUSPENDED", JobState::Pending },
    running = { "RUNNING", JobState::Running },
    completed = { "COMPLETED", JobState::Success },
    cancelled = { "CANCELLED", JobState::Canceled },
    failed = { "FAILED", JobState::Failure },
    node_fail = { "NODE_FAIL", JobState::Failure },
    preempted = { "PREEMPTED", JobState::Failure },
    boot_fail = { "BOOT_FAIL", JobState::Failure },
    deadline = { "DEADLINE", JobState::Failure },
    oom = { "OUT_OF_MEMORY", JobState::Failure },
    timeout = { "TIMEOUT", JobState::TimedOut },
)]
fn native_states_map_into_common_taxonomy(native: &str, expected: JobState) {
    let (state, _) = map_native_state(native);
    assert_eq!(state, expected);
}

#[test]
fn unrecognized_native_state_is_unknown() {
    let (state, message) = map_native_state("REVOKED");
    assert_eq!(state, JobState::Unknown);
    assert!(message.contains("raw state=REVOKED"));
}
