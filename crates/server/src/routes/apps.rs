// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application listing and option-schema description.

use crate::context::AppContext;
use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

pub async fn list_apps(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    ctx.auth.identify(&headers).await?;
    Ok((StatusCode::OK, Json(ctx.registry.app_names_json())).into_response())
}

pub async fn describe_app(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    ctx.auth.identify(&headers).await?;
    let schema = ctx
        .registry
        .describe(&name)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown app {}!", name)))?;
    Ok((StatusCode::OK, Json(schema)).into_response())
}
