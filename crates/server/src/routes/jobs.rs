// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission, lifecycle, and output artifacts.

use super::files::attachment;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::submit::submit_job;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use serde_json::{json, Value};
use sfrest_core::{JobRecord, JobState, SchedulerKind};
use sfrest_engine::{resolve_artifact, Artifact};
use std::sync::Arc;

pub async fn submit(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let outcome = submit_job(&ctx, &user, &body).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome.to_json())).into_response())
}

pub async fn list_jobs(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let records = ctx.jobs.find_many(&user)?;
    Ok((StatusCode::OK, Json(json!(records))).into_response())
}

pub async fn status(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = load_record(&ctx, &user, &id)?;
    Ok((StatusCode::OK, Json(json!(record))).into_response())
}

/// Translate a user cancel into adapter-specific termination. The record
/// is set to `CANCELED` regardless of whether the process stopped in
/// time; the next reconciliation cycle may downgrade the state if the
/// backend reports terminal differently.
pub async fn cancel(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = load_record(&ctx, &user, &id)?;

    if record.state.is_terminal() {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "status": format!("Job already in state {}, nothing to cancel", record.state),
                "job_id": id,
            })),
        )
            .into_response());
    }

    let adapter = ctx.scheduler_for(record.scheduler).ok_or_else(|| {
        ApiError::Internal(format!("no adapter configured for scheduler '{}'", record.scheduler))
    })?;
    // The local adapter revokes/kills by job id; the others by pid.
    let handle = match record.scheduler {
        SchedulerKind::Local => record.job_id.clone(),
        _ => record.pid.clone(),
    };

    let cancel_status = match adapter.cancel(&handle).await {
        Ok(()) => "Job canceled with success".to_string(),
        Err(e) => {
            tracing::warn!(job_id = %id, error = %e, "adapter cancel failed");
            format!("Cancel requested but backend reported: {}", e)
        }
    };

    if let Err(e) = ctx.jobs.update_status(
        &user,
        &id,
        JobState::Canceled,
        "Job was canceled by user",
        None,
        None,
    ) {
        tracing::warn!(job_id = %id, error = %e, "failed to persist canceled state");
    }

    Ok((StatusCode::OK, Json(json!({ "status": cancel_status, "job_id": id }))).into_response())
}

/// Stream the packaged archive, or report 202 while the job is still
/// unfinished (or died before producing output).
pub async fn output_archive(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = load_record(&ctx, &user, &id)?;

    if record.state.is_unfinished() || record.state == JobState::Aborted {
        return Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "job_id": id,
                "state": record.state,
                "status": "Job aborted or not completed, no output data available",
            })),
        )
            .into_response());
    }

    let archive = resolve_artifact(&record, Artifact::Archive).map_err(|_| {
        ApiError::Internal(format!("Job output file {} not found!", record.archive_name()))
    })?;
    attachment(
        &archive.display().to_string(),
        &record.archive_name(),
        "application/gzip",
    )
    .await
}

pub async fn island_catalog_json(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    catalog_json(&ctx, &headers, &id, Artifact::IslandCatalogJson).await
}

pub async fn island_catalog_file(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    catalog_file(&ctx, &headers, &id, Artifact::IslandCatalogRaw).await
}

pub async fn component_catalog_json(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    catalog_json(&ctx, &headers, &id, Artifact::ComponentCatalogJson).await
}

pub async fn component_catalog_file(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    catalog_file(&ctx, &headers, &id, Artifact::ComponentCatalogRaw).await
}

/// Base64 preview image inside a JSON envelope.
pub async fn preview_envelope(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = load_record(&ctx, &user, &id)?;
    let path = resolve(&record, Artifact::PreviewImage)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read preview: {}", e)))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok((StatusCode::OK, Json(json!({ "status": "", "image": encoded }))).into_response())
}

pub async fn preview_file(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = load_record(&ctx, &user, &id)?;
    let path = resolve(&record, Artifact::PreviewImage)?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("plot.png").to_string();
    attachment(&path.display().to_string(), &filename, "image/png").await
}

async fn catalog_json(
    ctx: &AppContext,
    headers: &HeaderMap,
    id: &str,
    artifact: Artifact,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(headers).await?;
    let record = load_record(ctx, &user, id)?;
    let path = resolve(&record, artifact)?;

    let raw = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read catalog: {}", e)))?;
    let body: Value = serde_json::from_slice(&raw)
        .map_err(|e| ApiError::Internal(format!("catalog is not valid JSON: {}", e)))?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

async fn catalog_file(
    ctx: &AppContext,
    headers: &HeaderMap,
    id: &str,
    artifact: Artifact,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(headers).await?;
    let record = load_record(ctx, &user, id)?;
    let path = resolve(&record, artifact)?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("catalog.dat").to_string();
    attachment(&path.display().to_string(), &filename, "application/octet-stream").await
}

fn resolve(record: &JobRecord, artifact: Artifact) -> Result<std::path::PathBuf, ApiError> {
    resolve_artifact(record, artifact)
        .map_err(|e| ApiError::NotFound(e.to_string()))
}

fn load_record(ctx: &AppContext, user: &str, id: &str) -> Result<JobRecord, ApiError> {
    ctx.jobs
        .find_one(user, id)?
        .ok_or_else(|| ApiError::NotFound(format!("No job found with id {}!", id)))
}
