// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable service configuration.
//!
//! A single `Config` value is deserialized at startup (TOML file plus CLI
//! overrides) and passed into the service factory. Nothing reads
//! configuration from globals.

use crate::job::SchedulerKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// One server-side → cluster-side path prefix mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMap {
    /// Prefix as seen by this service.
    pub server: String,
    /// Prefix as seen inside the HPC cluster.
    pub cluster: String,
}

impl PathMap {
    /// Substitute the server-side prefix with the cluster-side one.
    /// Returns `None` when the path does not carry the expected prefix.
    pub fn translate(&self, path: &str) -> Option<String> {
        path.strip_prefix(&self.server)
            .map(|rest| format!("{}{}", self.cluster, rest))
    }
}

/// Server→cluster path mappings used by the HPC adapter: one pair for the
/// job directory tree, one for the data directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPathMap {
    pub job_dir: PathMap,
    pub data_dir: PathMap,
}

impl Default for ClusterPathMap {
    fn default() -> Self {
        Self {
            job_dir: PathMap {
                server: "/opt/sfrest/jobs".to_string(),
                cluster: "/mnt/storage/jobs".to_string(),
            },
            data_dir: PathMap {
                server: "/opt/sfrest/data".to_string(),
                cluster: "/mnt/storage/data".to_string(),
            },
        }
    }
}

/// Service configuration. Every field has a serde default so a partial TOML
/// file (or none at all) yields a runnable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for per-user job directories.
    pub job_root: PathBuf,
    /// Root directory for per-user uploaded data.
    pub data_root: PathBuf,
    /// Allowed upload extensions (matched case-insensitively).
    pub upload_allowed_formats: Vec<String>,
    /// Upload size cap in bytes.
    pub max_upload_bytes: u64,
    /// Backend that new jobs are dispatched to.
    pub job_scheduler: SchedulerKind,
    /// Reconciliation / worker poll period.
    pub monitor_period_sec: u64,
    /// Accounting aggregation period.
    pub accounter_period_sec: u64,
    /// Number of local worker tasks consuming the queue.
    pub local_workers: usize,
    /// Soft time limit for locally executed jobs, seconds.
    pub job_soft_time_limit_sec: u64,
    /// Clamp for validator-derived parallelism hints.
    pub max_cores: u32,
    /// Network-weights file used by the Mask R-CNN application.
    pub mrcnn_weights: PathBuf,

    /// Listen address of the HTTP surface.
    pub bind_addr: String,

    /// Load orchestrator credentials from the in-cluster service account.
    pub orchestrator_in_cluster: bool,
    /// Kubeconfig path when not running in-cluster (empty = default search).
    pub orchestrator_config_path: Option<PathBuf>,
    pub orchestrator_cert: Option<PathBuf>,
    pub orchestrator_key: Option<PathBuf>,
    pub orchestrator_ca: Option<PathBuf>,
    /// Namespace workloads are created in.
    pub orchestrator_namespace: String,

    pub hpc_host: String,
    pub hpc_port: u16,
    pub hpc_user: String,
    /// Path of the symmetric signing key shared with the cluster REST
    /// service.
    pub hpc_key_path: PathBuf,
    pub hpc_queue: String,
    /// Cluster-side working directory for batch logs (must be writable by
    /// `hpc_user`).
    pub hpc_batch_workdir: String,
    pub hpc_app_to_cluster_path_map: ClusterPathMap,
    /// Clamp for tasks / cpus_per_task in the submitted job body.
    pub hpc_max_cores: u32,
    /// Bounded timeout applied to every cluster REST call.
    pub hpc_request_timeout_sec: u64,
    /// Lifetime of minted auth tokens.
    pub hpc_token_duration_sec: u64,
    /// Re-mint the token when it would expire within this headroom.
    pub hpc_token_renew_headroom_sec: u64,
    /// Seconds the batch script sleeps before starting, letting a
    /// network-mounted job directory become visible.
    pub hpc_mount_settle_sec: u64,

    /// Mount point of the remote storage volume inside containers.
    pub remote_storage_mount_path: String,
    /// Remote storage name as known to the mount helper.
    pub remote_storage_name: String,
    /// Path inside the remote storage to mount.
    pub remote_storage_path: String,
    /// Name of the orchestrator secret holding remote-storage credentials.
    pub remote_storage_secret: String,

    pub auth_enabled: bool,
    /// Client-secrets file for the OpenID provider.
    pub auth_client_secrets: Option<PathBuf>,
    pub auth_realm: String,

    /// Location of the JSON document store (`file://<dir>` or a bare path).
    pub doc_store_uri: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job_root: PathBuf::from("/opt/sfrest/jobs"),
            data_root: PathBuf::from("/opt/sfrest/data"),
            upload_allowed_formats: ["png", "jpg", "jpeg", "gif", "fits"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_upload_bytes: 16 * 1024 * 1024,
            job_scheduler: SchedulerKind::Local,
            monitor_period_sec: 5,
            accounter_period_sec: 600,
            local_workers: 2,
            job_soft_time_limit_sec: 18_000,
            max_cores: 16,
            mrcnn_weights: PathBuf::from("/opt/software/mrcnn/share/mrcnn_weights.h5"),
            bind_addr: "0.0.0.0:8080".to_string(),
            orchestrator_in_cluster: false,
            orchestrator_config_path: None,
            orchestrator_cert: None,
            orchestrator_key: None,
            orchestrator_ca: None,
            orchestrator_namespace: "default".to_string(),
            hpc_host: String::new(),
            hpc_port: 6820,
            hpc_user: String::new(),
            hpc_key_path: PathBuf::new(),
            hpc_queue: "normal".to_string(),
            hpc_batch_workdir: String::new(),
            hpc_app_to_cluster_path_map: ClusterPathMap::default(),
            hpc_max_cores: 32,
            hpc_request_timeout_sec: 10,
            hpc_token_duration_sec: 3600,
            hpc_token_renew_headroom_sec: 30,
            hpc_mount_settle_sec: 5,
            remote_storage_mount_path: "/mnt/storage".to_string(),
            remote_storage_name: "neanias-nextcloud".to_string(),
            remote_storage_path: ".".to_string(),
            remote_storage_secret: "rclone-secret".to_string(),
            auth_enabled: false,
            auth_client_secrets: None,
            auth_realm: "neanias-development".to_string(),
            doc_store_uri: "file:///opt/sfrest/db".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Directory rooting the document store, resolved from `doc_store_uri`.
    pub fn doc_store_dir(&self) -> PathBuf {
        let uri = self.doc_store_uri.strip_prefix("file://").unwrap_or(&self.doc_store_uri);
        PathBuf::from(uri)
    }

    /// Whether the given file extension is accepted for upload.
    pub fn upload_format_allowed(&self, ext: &str) -> bool {
        let lower = ext.to_ascii_lowercase();
        self.upload_allowed_formats.iter().any(|f| f.eq_ignore_ascii_case(&lower))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
