// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container-orchestrator adapter — one batch workload per job.
//!
//! The workload name is the client-chosen job id, so the pid and job id
//! coincide for this backend. Terminal workloads are deleted with
//! background propagation and zero grace period because some backends leak
//! succeeded workloads.

mod workload;

pub use workload::{map_workload_status, WorkloadParams};

use crate::adapter::{JobSpec, Scheduler, StatusReport, Submission};
use crate::error::SchedulerError;
use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job as BatchJob;
use kube::api::{Api, DeleteParams, PostParams, PropagationPolicy};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use sfrest_core::{Clock, Config, JobState, SystemClock};

/// Remote-storage wiring injected into every workload.
#[derive(Debug, Clone)]
pub struct RemoteStorage {
    pub name: String,
    pub path: String,
    pub mount_path: String,
    pub secret: String,
}

impl RemoteStorage {
    fn from_config(config: &Config) -> Self {
        Self {
            name: config.remote_storage_name.clone(),
            path: config.remote_storage_path.clone(),
            mount_path: config.remote_storage_mount_path.clone(),
            secret: config.remote_storage_secret.clone(),
        }
    }
}

pub struct OrchestratorScheduler {
    api: Api<BatchJob>,
    storage: RemoteStorage,
    clock: SystemClock,
}

impl OrchestratorScheduler {
    /// Build the client from the in-cluster service account or from a
    /// kubeconfig file, honoring the configured cert/key/CA overrides.
    pub async fn new(config: &Config) -> Result<Self, SchedulerError> {
        let client = Self::build_client(config).await?;
        let api: Api<BatchJob> =
            Api::namespaced(client, &config.orchestrator_namespace);
        Ok(Self {
            api,
            storage: RemoteStorage::from_config(config),
            clock: SystemClock,
        })
    }

    async fn build_client(config: &Config) -> Result<Client, SchedulerError> {
        if config.orchestrator_in_cluster {
            return Client::try_default()
                .await
                .map_err(|e| SchedulerError::Dispatch(format!("in-cluster client: {}", e)));
        }
        match &config.orchestrator_config_path {
            Some(path) => {
                let mut kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| SchedulerError::Dispatch(format!("kubeconfig: {}", e)))?;
                apply_tls_overrides(&mut kubeconfig, config);
                let kube_config = kube::Config::from_custom_kubeconfig(
                    kubeconfig,
                    &KubeConfigOptions::default(),
                )
                .await
                .map_err(|e| SchedulerError::Dispatch(format!("kubeconfig: {}", e)))?;
                Client::try_from(kube_config)
                    .map_err(|e| SchedulerError::Dispatch(format!("kube client: {}", e)))
            }
            None => Client::try_default()
                .await
                .map_err(|e| SchedulerError::Dispatch(format!("kube client: {}", e))),
        }
    }
}

/// Point the kubeconfig entries at the configured cert/key/CA files.
fn apply_tls_overrides(kubeconfig: &mut Kubeconfig, config: &Config) {
    if let Some(ca) = &config.orchestrator_ca {
        for named in &mut kubeconfig.clusters {
            if let Some(cluster) = &mut named.cluster {
                cluster.certificate_authority = Some(ca.display().to_string());
                cluster.certificate_authority_data = None;
            }
        }
    }
    for named in &mut kubeconfig.auth_infos {
        if let Some(auth) = &mut named.auth_info {
            if let Some(cert) = &config.orchestrator_cert {
                auth.client_certificate = Some(cert.display().to_string());
                auth.client_certificate_data = None;
            }
            if let Some(key) = &config.orchestrator_key {
                auth.client_key = Some(key.display().to_string());
                auth.client_key_data = None;
            }
        }
    }
}

#[async_trait]
impl Scheduler for OrchestratorScheduler {
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError> {
        let params = WorkloadParams {
            name: spec.job_id.clone(),
            image: spec.image.clone(),
            command: spec.command.clone(),
            args: spec.args.clone(),
            arg_string: spec.arg_string(),
            storage: self.storage.clone(),
        };
        let workload = workload::build_workload(&params);

        tracing::info!(job_id = %spec.job_id, image = %spec.image, "creating batch workload");
        self.api
            .create(&PostParams::default(), &workload)
            .await
            .map_err(|e| SchedulerError::Dispatch(format!("workload creation failed: {}", e)))?;

        Ok(Submission {
            pid: spec.job_id.clone(),
            job_id: spec.job_id,
            submit_date: self.clock.utc_iso(),
            state: JobState::Pending,
        })
    }

    async fn status(&self, pid: &str) -> Result<Option<StatusReport>, SchedulerError> {
        let workload = match self.api.get(pid).await {
            Ok(workload) => workload,
            Err(kube::Error::Api(ae)) if ae.code == 404 => return Ok(None),
            Err(e) => return Err(SchedulerError::Remote(e.to_string())),
        };
        Ok(Some(map_workload_status(pid, workload.status.as_ref())))
    }

    /// Delete the workload. Used both for user cancellation and for the
    /// reconciler's terminal-state garbage collection.
    async fn cancel(&self, pid: &str) -> Result<(), SchedulerError> {
        let dp = DeleteParams {
            grace_period_seconds: Some(0),
            propagation_policy: Some(PropagationPolicy::Background),
            ..DeleteParams::default()
        };
        match self.api.delete(pid, &dp).await {
            Ok(_) => Ok(()),
            // Already gone: cancel-after-terminal is a no-op.
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(()),
            Err(e) => Err(SchedulerError::Cancel(e.to_string())),
        }
    }
}
