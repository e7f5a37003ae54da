// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use yare::parameterized;

fn params() -> WorkloadParams {
    WorkloadParams {
        name: "ab12cd".to_string(),
        image: "sriggi/caesar-job:latest".to_string(),
        command: "SFinderSubmitter.sh".to_string(),
        args: vec!["--run".to_string(), "--seedthr=5.0".to_string()],
        arg_string: "--run --seedthr=5.0".to_string(),
        storage: RemoteStorage {
            name: "neanias-nextcloud".to_string(),
            path: ".".to_string(),
            mount_path: "/mnt/storage".to_string(),
            secret: "rclone-secret".to_string(),
        },
    }
}

fn status(active: i32, succeeded: i32, failed: i32) -> JobStatus {
    JobStatus {
        active: Some(active),
        succeeded: Some(succeeded),
        failed: Some(failed),
        ..JobStatus::default()
    }
}

#[test]
fn workload_is_named_after_the_job_id() {
    let workload = build_workload(&params());
    assert_eq!(workload.metadata.name.as_deref(), Some("ab12cd"));
}

#[test]
fn workload_runs_one_container_with_the_command() {
    let workload = build_workload(&params());
    let spec = workload.spec.unwrap();
    assert_eq!(spec.backoff_limit, Some(0));

    let pod = spec.template.spec.unwrap();
    assert_eq!(pod.restart_policy.as_deref(), Some("Never"));
    assert_eq!(pod.containers.len(), 1);

    let container = &pod.containers[0];
    assert_eq!(container.command.as_ref().unwrap()[0], "SFinderSubmitter.sh");
    assert_eq!(container.args.as_ref().unwrap()[1], "--seedthr=5.0");
}

#[test]
fn workload_env_carries_job_options_and_storage() {
    let workload = build_workload(&params());
    let pod = workload.spec.unwrap().template.spec.unwrap();
    let env = pod.containers[0].env.as_ref().unwrap();

    let get = |name: &str| -> &str {
        env.iter()
            .find(|e| e.name == name)
            .and_then(|e| e.value.as_deref())
            .unwrap_or_default()
    };
    assert_eq!(get("JOB_OPTIONS"), "--run --seedthr=5.0");
    assert_eq!(get("RCLONE_REMOTE_STORAGE"), "neanias-nextcloud");
    assert_eq!(get("MOUNT_VOLUME_PATH"), "/mnt/storage");
}

#[test]
fn workload_mounts_credentials_secret() {
    let workload = build_workload(&params());
    let pod = workload.spec.unwrap().template.spec.unwrap();

    let volumes = pod.volumes.as_ref().unwrap();
    let secret_vol = volumes.iter().find(|v| v.name == "storage-credentials").unwrap();
    assert_eq!(
        secret_vol.secret.as_ref().unwrap().secret_name.as_deref(),
        Some("rclone-secret")
    );
    assert_eq!(pod.security_context.as_ref().unwrap().fs_group, Some(1000));
}

#[parameterized(
    running = { 1, 0, 0, JobState::Running },
    success = { 0, 1, 0, JobState::Success },
    failure = { 0, 0, 1, JobState::Failure },
    pending = { 0, 0, 0, JobState::Pending },
)]
fn condition_counters_map(active: i32, succeeded: i32, failed: i32, expected: JobState) {
    let report = map_workload_status("w1", Some(&status(active, succeeded, failed)));
    assert_eq!(report.state, expected);
    assert_eq!(report.exit_code, -1);
}

#[test]
fn missing_status_maps_to_pending() {
    let report = map_workload_status("w1", None);
    assert_eq!(report.state, JobState::Pending);
}

#[test]
fn success_elapsed_is_completion_minus_start() {
    use k8s_openapi::chrono;

    let mut s = status(0, 1, 0);
    let start = chrono::DateTime::parse_from_rfc3339("2026-02-01T10:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let end = start + chrono::Duration::seconds(90);
    s.start_time = Some(Time(start));
    s.completion_time = Some(Time(end));

    let report = map_workload_status("w1", Some(&s));
    assert_eq!(report.elapsed_time, 90.0);
}

#[test]
fn failure_message_carries_first_condition() {
    let mut s = status(0, 0, 1);
    s.conditions = Some(vec![k8s_openapi::api::batch::v1::JobCondition {
        message: Some("BackoffLimitExceeded".to_string()),
        status: "True".to_string(),
        type_: "Failed".to_string(),
        ..Default::default()
    }]);

    let report = map_workload_status("w1", Some(&s));
    assert_eq!(report.state, JobState::Failure);
    assert!(report.status.contains("BackoffLimitExceeded"));
}
