// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table under `/api/v1`.

mod accounting;
mod apps;
mod files;
mod jobs;

use crate::context::AppContext;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(ctx: Arc<AppContext>) -> Router {
    // the framework default body cap is far below the configured upload cap
    let body_limit = DefaultBodyLimit::max(ctx.config.max_upload_bytes as usize);
    let api = Router::new()
        .route("/upload", post(files::upload))
        .route("/fileids", get(files::list_file_ids))
        .route("/download/:id", get(files::download))
        .route("/delete/:id", get(files::delete))
        .route("/apps", get(apps::list_apps))
        .route("/app/:name/describe", get(apps::describe_app))
        .route("/job", post(jobs::submit))
        .route("/jobs", get(jobs::list_jobs))
        .route("/job/:id/status", get(jobs::status))
        .route("/job/:id/cancel", get(jobs::cancel))
        .route("/job/:id/output", get(jobs::output_archive))
        .route("/job/:id/sources", get(jobs::island_catalog_json))
        .route("/job/:id/output-sources", get(jobs::island_catalog_file))
        .route("/job/:id/source-components", get(jobs::component_catalog_json))
        .route("/job/:id/output-components", get(jobs::component_catalog_file))
        .route("/job/:id/preview", get(jobs::preview_envelope))
        .route("/job/:id/output-plot", get(jobs::preview_file))
        .route("/accounting", get(accounting::user_accounting))
        .route("/appstats", get(accounting::app_stats))
        .layer(body_limit)
        .with_state(ctx);

    Router::new().nest("/api/v1", api).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
