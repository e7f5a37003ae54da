// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission controller.
//!
//! Orchestrates one job submission end to end: resolve inputs, validate,
//! synthesize the command, create the job directory, dispatch on the
//! configured backend, persist the `PENDING` record. The flow
//! short-circuits on the first failure; nothing is persisted unless the
//! dispatch succeeded.

use crate::context::AppContext;
use crate::error::ApiError;
use serde_json::{json, Value};
use sfrest_core::{JobRecord, SchedulerKind};
use sfrest_sched::JobSpec;
use std::collections::HashMap;

/// Result of an accepted submission, rendered into the 202 response.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub job_id: String,
    pub app: String,
    pub submit_date: String,
    pub job_inputs: Value,
    /// Human status; carries a soft warning when the record insert failed
    /// after a successful dispatch.
    pub status: String,
}

impl SubmitOutcome {
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status,
            "app": self.app,
            "job_id": self.job_id,
            "submit_date": self.submit_date,
            "job_inputs": self.job_inputs,
            "state": "PENDING",
        })
    }
}

pub async fn submit_job(
    ctx: &AppContext,
    user: &str,
    body: &Value,
) -> Result<SubmitOutcome, ApiError> {
    // Required request fields, each with a precise diagnostic.
    let app = body
        .get("app")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No app name found in request!".to_string()))?;
    let job_inputs = body
        .get("job_inputs")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::BadRequest("No job inputs found in request!".to_string()))?;
    let data_inputs = body
        .get("data_inputs")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No data inputs found in request!".to_string()))?;
    let tag = body.get("tag").and_then(Value::as_str).unwrap_or_default();

    // Resolve the input handle through this user's file partition.
    let file = ctx
        .files
        .resolve(user, data_inputs)?
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Cannot find file with id {} for user {}!",
                data_inputs, user
            ))
        })?;

    // Validation is pure; the rejection message goes to the client as-is.
    let validated = ctx.registry.validate(app, job_inputs, &file.filepath)?;
    let descriptor = ctx
        .registry
        .get(app)
        .ok_or_else(|| ApiError::BadRequest(format!("App {} not known or supported", app)))?;

    let job_id = uuid::Uuid::new_v4().simple().to_string();
    let job_top_dir = ctx.config.job_root.join(user);
    let job_dir = job_top_dir.join(format!("job_{}", job_id));

    // The orchestrator and HPC backends need the server-side job directory
    // to exist before the workload starts writing into it; the local
    // worker creates its own.
    if ctx.config.job_scheduler != SchedulerKind::Local {
        std::fs::create_dir_all(&job_dir)
            .map_err(|e| ApiError::Internal(format!("cannot create job directory: {}", e)))?;
    }

    let scheduler = ctx
        .active_scheduler()
        .ok_or_else(|| {
            ApiError::Internal(format!(
                "no adapter configured for scheduler '{}'",
                ctx.config.job_scheduler
            ))
        })?;

    let spec = JobSpec {
        job_id: job_id.clone(),
        user: user.to_string(),
        app: app.to_string(),
        image: descriptor.image.clone(),
        command: validated.command.clone(),
        args: validated.args.clone(),
        job_dir,
        data_path: file.filepath.clone(),
        hints: validated.hints,
    };

    // Dispatch failure returns an error without persisting anything.
    let submission = scheduler.submit(spec).await?;
    tracing::info!(job_id, user, app, scheduler = %ctx.config.job_scheduler, "job dispatched");

    let inputs_map: HashMap<String, Value> = job_inputs
        .as_object()
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    let record = JobRecord::pending(
        &job_id,
        &submission.pid,
        user,
        app,
        &submission.submit_date,
        inputs_map,
        data_inputs,
        job_top_dir.display().to_string(),
        tag,
        ctx.config.job_scheduler,
    );

    // A failed insert degrades to a soft warning: the job is already
    // running, and the next reconciliation cycle repairs the record for
    // the backends it can discover.
    let status = match ctx.jobs.insert(&record) {
        Ok(()) => "Job submitted with success".to_string(),
        Err(e) => {
            tracing::warn!(job_id, error = %e, "job dispatched but record insert failed");
            "Job submitted but failed to be registered, tracking resumes on the next \
             reconciliation cycle"
                .to_string()
        }
    };

    Ok(SubmitOutcome {
        job_id,
        app: app.to_string(),
        submit_date: submission.submit_date,
        job_inputs: job_inputs.clone(),
        status,
    })
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
