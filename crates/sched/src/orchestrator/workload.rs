// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload construction and status mapping.

use super::RemoteStorage;
use crate::adapter::StatusReport;
use k8s_openapi::api::batch::v1::{Job as BatchJob, JobSpec as BatchJobSpec, JobStatus};
use k8s_openapi::api::core::v1::{
    Capabilities, Container, EnvVar, HostPathVolumeSource, PodSecurityContext, PodSpec,
    PodTemplateSpec, SecretVolumeSource, SecurityContext, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use sfrest_core::JobState;
use std::collections::BTreeMap;

/// Inputs for one batch workload.
#[derive(Debug, Clone)]
pub struct WorkloadParams {
    /// Workload name, equal to the client-chosen job id.
    pub name: String,
    pub image: String,
    pub command: String,
    pub args: Vec<String>,
    /// Synthesized argument string exported as `JOB_OPTIONS`.
    pub arg_string: String,
    pub storage: RemoteStorage,
}

const APP_LABEL: &str = "sfrest-job";
const TTL_AFTER_FINISHED: i32 = 60;

/// One container per job, remote-storage credentials from a mounted
/// secret, storage volume mounted by the entrypoint via fuse.
pub(crate) fn build_workload(params: &WorkloadParams) -> BatchJob {
    let env = vec![
        env_var("JOB_OPTIONS", &params.arg_string),
        env_var("MOUNT_RCLONE_VOLUME", "1"),
        env_var("RCLONE_REMOTE_STORAGE", &params.storage.name),
        env_var("RCLONE_REMOTE_STORAGE_PATH", &params.storage.path),
        env_var("MOUNT_VOLUME_PATH", &params.storage.mount_path),
        env_var("RCLONE_MOUNT_WAIT_TIME", "10"),
    ];

    // fuse mounts inside the container need SYS_ADMIN
    let security_context = SecurityContext {
        privileged: Some(true),
        capabilities: Some(Capabilities {
            add: Some(vec!["SYS_ADMIN".to_string()]),
            ..Capabilities::default()
        }),
        ..SecurityContext::default()
    };

    let container = Container {
        name: params.name.clone(),
        image: Some(params.image.clone()),
        image_pull_policy: Some("Always".to_string()),
        command: Some(vec![params.command.clone()]),
        args: Some(params.args.clone()),
        env: Some(env),
        security_context: Some(security_context),
        volume_mounts: Some(vec![
            VolumeMount {
                name: "storage-credentials".to_string(),
                mount_path: "/root/.config/rclone/".to_string(),
                ..VolumeMount::default()
            },
            VolumeMount {
                name: "fuse".to_string(),
                mount_path: "/dev/fuse".to_string(),
                ..VolumeMount::default()
            },
        ]),
        ..Container::default()
    };

    let volumes = vec![
        Volume {
            name: "storage-credentials".to_string(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(params.storage.secret.clone()),
                ..SecretVolumeSource::default()
            }),
            ..Volume::default()
        },
        Volume {
            name: "fuse".to_string(),
            host_path: Some(HostPathVolumeSource {
                path: "/dev/fuse".to_string(),
                ..HostPathVolumeSource::default()
            }),
            ..Volume::default()
        },
    ];

    let labels = BTreeMap::from([("app".to_string(), APP_LABEL.to_string())]);

    let template = PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels.clone()),
            ..ObjectMeta::default()
        }),
        spec: Some(PodSpec {
            restart_policy: Some("Never".to_string()),
            containers: vec![container],
            security_context: Some(PodSecurityContext {
                fs_group: Some(1000),
                ..PodSecurityContext::default()
            }),
            volumes: Some(volumes),
            ..PodSpec::default()
        }),
    };

    BatchJob {
        metadata: ObjectMeta {
            name: Some(params.name.clone()),
            labels: Some(labels),
            ..ObjectMeta::default()
        },
        spec: Some(BatchJobSpec {
            template,
            backoff_limit: Some(0),
            ttl_seconds_after_finished: Some(TTL_AFTER_FINISHED),
            ..BatchJobSpec::default()
        }),
        status: None,
    }
}

/// Map the workload's condition counters into the common taxonomy.
///
/// Container exit codes are not reliably available from the workload
/// status, so `exit_code` stays -1.
pub fn map_workload_status(pid: &str, status: Option<&JobStatus>) -> StatusReport {
    let (active, succeeded, failed) = match status {
        Some(s) => (
            s.active.unwrap_or(0),
            s.succeeded.unwrap_or(0),
            s.failed.unwrap_or(0),
        ),
        None => (0, 0, 0),
    };

    let (state, message) = if succeeded >= 1 {
        (JobState::Success, "Job completed with success".to_string())
    } else if failed >= 1 {
        let detail = status
            .and_then(|s| s.conditions.as_ref())
            .and_then(|c| c.first())
            .and_then(|c| c.message.clone())
            .unwrap_or_default();
        (JobState::Failure, format!("Job failed (err={})", detail))
    } else if active >= 1 {
        (JobState::Running, "Job pod is running".to_string())
    } else {
        (
            JobState::Pending,
            "Job present in cluster but pod not yet running".to_string(),
        )
    };

    let elapsed_time = if state == JobState::Success {
        status
            .and_then(|s| match (&s.start_time, &s.completion_time) {
                (Some(start), Some(end)) => Some((end.0 - start.0).num_seconds() as f64),
                _ => None,
            })
            .unwrap_or(0.0)
    } else {
        0.0
    };

    StatusReport {
        pid: pid.to_string(),
        state,
        status: message,
        exit_code: -1,
        elapsed_time,
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        value_from: None,
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
