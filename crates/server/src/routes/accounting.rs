// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accounting and global statistics endpoints.

use crate::context::AppContext;
use crate::error::ApiError;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub async fn user_accounting(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = ctx.accounting.get_user(&user)?.ok_or_else(|| {
        ApiError::NotFound(format!("No accounting data computed yet for user {}!", user))
    })?;
    Ok((StatusCode::OK, Json(json!(record))).into_response())
}

pub async fn app_stats(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    ctx.auth.identify(&headers).await?;
    let stats = ctx
        .accounting
        .get_appstats()?
        .ok_or_else(|| ApiError::NotFound("No app statistics computed yet!".to_string()))?;
    Ok((StatusCode::OK, Json(json!(stats))).into_response())
}
