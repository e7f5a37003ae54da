// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HPC-cluster adapter over the scheduler's REST endpoint.
//!
//! Every call carries the cluster username and a short-lived HS256 token in
//! headers, with a bounded request timeout. Native job states are mapped
//! into the common taxonomy here; the batch of unfinished jobs is resolved
//! with a single list-jobs call instead of N queries.

mod script;
mod token;

pub use script::{build_job_body, build_script, clamp_to_max, map_native_state, BatchScript};
pub use token::TokenManager;

use crate::adapter::{JobSpec, Scheduler, StatusReport, Submission};
use crate::error::SchedulerError;
use async_trait::async_trait;
use serde::Deserialize;
use sfrest_core::{Clock, ClusterPathMap, Config, JobState, SystemClock};
use std::collections::HashMap;
use std::time::Duration;

const API_PREFIX: &str = "/slurm/v0.0.36";
const USER_HEADER: &str = "X-SLURM-USER-NAME";
const TOKEN_HEADER: &str = "X-SLURM-USER-TOKEN";

#[derive(Debug, Deserialize)]
struct SubmitReply {
    job_id: Option<u64>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: String,
}

#[derive(Debug, Deserialize)]
struct JobsReply {
    #[serde(default)]
    jobs: Vec<NativeJob>,
}

#[derive(Debug, Deserialize)]
struct NativeJob {
    job_id: u64,
    job_state: String,
    #[serde(default)]
    start_time: i64,
    #[serde(default)]
    end_time: i64,
    #[serde(default = "unknown_exit_code")]
    exit_code: i32,
}

fn unknown_exit_code() -> i32 {
    -1
}

pub struct HpcScheduler {
    http: reqwest::Client,
    base_url: String,
    username: String,
    partition: String,
    batch_workdir: String,
    path_map: ClusterPathMap,
    max_cores: u32,
    mount_settle_sec: u64,
    tokens: TokenManager<SystemClock>,
    clock: SystemClock,
}

impl HpcScheduler {
    pub fn new(config: &Config) -> Result<Self, SchedulerError> {
        if config.hpc_host.is_empty() {
            return Err(SchedulerError::Dispatch(
                "empty cluster hostname given, check configuration".to_string(),
            ));
        }
        if config.hpc_user.is_empty() {
            return Err(SchedulerError::Dispatch(
                "empty cluster username given, check configuration".to_string(),
            ));
        }
        if config.hpc_queue.is_empty() {
            return Err(SchedulerError::Dispatch(
                "empty cluster queue given, check configuration".to_string(),
            ));
        }

        let batch_workdir = if config.hpc_batch_workdir.is_empty() {
            format!("/home/{}", config.hpc_user)
        } else {
            config.hpc_batch_workdir.clone()
        };

        let tokens = TokenManager::load(
            &config.hpc_key_path,
            config.hpc_user.clone(),
            config.hpc_token_duration_sec,
            config.hpc_token_renew_headroom_sec,
            SystemClock,
        )?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.hpc_request_timeout_sec))
            .build()
            .map_err(|e| SchedulerError::Remote(format!("http client: {}", e)))?;

        Ok(Self {
            http,
            base_url: format!("http://{}:{}{}", config.hpc_host, config.hpc_port, API_PREFIX),
            username: config.hpc_user.clone(),
            partition: config.hpc_queue.clone(),
            batch_workdir,
            path_map: config.hpc_app_to_cluster_path_map.clone(),
            max_cores: config.hpc_max_cores,
            mount_settle_sec: config.hpc_mount_settle_sec,
            tokens,
            clock: SystemClock,
        })
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, SchedulerError> {
        // The pre-request headroom check lives inside current_token().
        let token = self.tokens.current_token()?;
        Ok(request
            .header(USER_HEADER, &self.username)
            .header(TOKEN_HEADER, token)
            .header(reqwest::header::CONTENT_TYPE, "application/json"))
    }

    fn report_from(&self, job: &NativeJob) -> StatusReport {
        let (state, status) = map_native_state(&job.job_state);
        let elapsed_time = (job.end_time - job.start_time).max(0) as f64;
        StatusReport {
            pid: job.job_id.to_string(),
            state,
            status,
            exit_code: job.exit_code,
            elapsed_time,
        }
    }

    async fn fetch_jobs(&self, url: String) -> Result<JobsReply, SchedulerError> {
        let request = self.authed(self.http.get(&url))?;
        let response = request
            .send()
            .await
            .map_err(|e| SchedulerError::Remote(format!("status query failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(SchedulerError::Remote(format!(
                "status query to {} replied {}",
                url,
                response.status()
            )));
        }
        response
            .json::<JobsReply>()
            .await
            .map_err(|e| SchedulerError::MalformedReply(e.to_string()))
    }
}

#[async_trait]
impl Scheduler for HpcScheduler {
    async fn submit(&self, spec: JobSpec) -> Result<Submission, SchedulerError> {
        let server_job_dir = spec.job_dir.display().to_string();
        let cluster_job_dir =
            self.path_map.job_dir.translate(&server_job_dir).ok_or_else(|| {
                SchedulerError::Dispatch(format!(
                    "job directory {} does not carry the expected prefix {}",
                    server_job_dir, self.path_map.job_dir.server
                ))
            })?;
        let cluster_data_path =
            self.path_map.data_dir.translate(&spec.data_path).ok_or_else(|| {
                SchedulerError::Dispatch(format!(
                    "input file {} does not carry the expected prefix {}",
                    spec.data_path, self.path_map.data_dir.server
                ))
            })?;

        let params = BatchScript {
            name: spec.job_id.clone(),
            image: spec.image.clone(),
            arg_string: spec.arg_string(),
            cluster_job_dir,
            cluster_data_path,
            mount_settle_sec: self.mount_settle_sec,
            tasks: clamp_to_max(spec.hints.nproc, self.max_cores),
            cpus_per_task: clamp_to_max(spec.hints.nthreads, self.max_cores),
        };
        let body = build_job_body(&params, &self.partition, &self.batch_workdir);

        let url = format!("{}/job/submit", self.base_url);
        tracing::info!(job_id = %spec.job_id, %url, "submitting batch job");
        let request = self.authed(self.http.post(&url))?.json(&body);
        let response = request
            .send()
            .await
            .map_err(|e| SchedulerError::Remote(format!("submission failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(SchedulerError::Dispatch(format!(
                "cluster replied with status {}",
                response.status()
            )));
        }
        let reply: SubmitReply = response
            .json()
            .await
            .map_err(|e| SchedulerError::MalformedReply(e.to_string()))?;

        let pid = reply.job_id.ok_or_else(|| {
            let details: Vec<String> = reply.errors.into_iter().map(|e| e.error).collect();
            SchedulerError::Dispatch(format!("submission rejected: {}", details.join("; ")))
        })?;

        tracing::info!(job_id = %spec.job_id, pid, "batch job accepted");
        Ok(Submission {
            job_id: spec.job_id,
            pid: pid.to_string(),
            submit_date: self.clock.utc_iso(),
            state: JobState::Pending,
        })
    }

    async fn status(&self, pid: &str) -> Result<Option<StatusReport>, SchedulerError> {
        let reply = self.fetch_jobs(format!("{}/job/{}", self.base_url, pid)).await?;
        // An empty list means the job was cleared from the controller.
        Ok(reply.jobs.first().map(|job| self.report_from(job)))
    }

    /// Single list-jobs call with a comma-joined pid filter. Pids the
    /// cluster has already cleared are absent from the result.
    async fn status_batch(
        &self,
        pids: &[String],
    ) -> Result<HashMap<String, StatusReport>, SchedulerError> {
        if pids.is_empty() {
            return Ok(HashMap::new());
        }
        let url = format!("{}/jobs?job_ids={}", self.base_url, pids.join(","));
        let reply = self.fetch_jobs(url).await?;

        let mut reports = HashMap::new();
        for job in &reply.jobs {
            reports.insert(job.job_id.to_string(), self.report_from(job));
        }
        Ok(reports)
    }

    async fn cancel(&self, pid: &str) -> Result<(), SchedulerError> {
        let url = format!("{}/job/{}", self.base_url, pid);
        tracing::info!(pid, "cancelling batch job");
        let request = self.authed(self.http.delete(&url))?;
        let response = request
            .send()
            .await
            .map_err(|e| SchedulerError::Remote(format!("cancel failed: {}", e)))?;
        if response.status().as_u16() == 200 {
            Ok(())
        } else {
            Err(SchedulerError::Cancel(format!(
                "cluster replied with status {}",
                response.status()
            )))
        }
    }
}
