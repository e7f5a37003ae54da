// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File upload, listing, download, and deletion.

use crate::context::AppContext;
use crate::error::ApiError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sfrest_core::{Clock, FileRecord};
use std::sync::Arc;

/// Multipart upload of a single file plus an optional `tag` field. The
/// stored name is the fresh file id with the original extension; the
/// original name survives only in the registration record.
pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;

    let mut file_bytes: Option<(String, Vec<u8>)> = None;
    let mut tag = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("upload read failed: {}", e)))?;
                file_bytes = Some((filename, bytes.to_vec()));
            }
            "tag" => {
                tag = field.text().await.unwrap_or_default();
            }
            _ => {}
        }
    }

    let (filename_orig, bytes) =
        file_bytes.ok_or_else(|| ApiError::BadRequest("Request has no file part".to_string()))?;
    if filename_orig.is_empty() {
        return Err(ApiError::BadRequest("No file selected for uploading".to_string()));
    }
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("No file retrieved from request".to_string()));
    }
    if bytes.len() as u64 > ctx.config.max_upload_bytes {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {} byte upload limit",
            ctx.config.max_upload_bytes
        )));
    }

    let fileext = filename_orig
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if fileext.is_empty() || !ctx.config.upload_format_allowed(&fileext) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "File format not allowed, allowed types are {{{}}}",
            ctx.config.upload_allowed_formats.join("|")
        )));
    }

    let fileid = uuid::Uuid::new_v4().simple().to_string();
    let user_dir = ctx.config.data_root.join(&user);
    std::fs::create_dir_all(&user_dir)
        .map_err(|e| ApiError::Internal(format!("cannot create user data directory: {}", e)))?;
    let dest = user_dir.join(format!("{}.{}", fileid, fileext));
    std::fs::write(&dest, &bytes)
        .map_err(|e| ApiError::Internal(format!("failed to store upload: {}", e)))?;

    let filesize = bytes.len() as f64 / (1024.0 * 1024.0);
    let filedate = ctx.clock.utc_iso();
    let record = FileRecord {
        fileid: fileid.clone(),
        filepath: dest.display().to_string(),
        filename_orig: filename_orig.clone(),
        fileext: fileext.clone(),
        filesize,
        filedate: filedate.clone(),
        tag: tag.clone(),
    };

    if let Err(e) = ctx.files.register(&user, &record) {
        tracing::warn!(fileid, error = %e, "uploaded file failed to register");
        return Err(ApiError::Internal(
            "File uploaded but failed to be registered".to_string(),
        ));
    }
    tracing::info!(fileid, user, size_mb = filesize, "file uploaded");

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "File uploaded with success",
            "uuid": fileid,
            "filename_orig": filename_orig,
            "format": fileext,
            "size": filesize,
            "date": filedate,
            "tag": tag,
        })),
    )
        .into_response())
}

pub async fn list_file_ids(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let files = ctx.files.list_public(&user)?;
    Ok((StatusCode::OK, Json(serde_json::Value::Array(files))).into_response())
}

pub async fn download(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = ctx
        .files
        .resolve(&user, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("File with id {} not found on the system!", id)))?;

    let filename = format!("{}.{}", record.fileid, record.fileext);
    attachment(&record.filepath, &filename, "application/octet-stream").await
}

/// Remove the file from disk and drop its registration.
pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = ctx.auth.identify(&headers).await?;
    let record = ctx
        .files
        .remove(&user, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("File with id {} not found on the system!", id)))?;

    if let Err(e) = std::fs::remove_file(&record.filepath) {
        tracing::warn!(fileid = %id, error = %e, "file removal from disk failed");
    }
    Ok((StatusCode::OK, Json(json!({ "status": "File deleted with success" }))).into_response())
}

/// Read a server-local file and return it as an attachment.
pub(crate) async fn attachment(
    path: &str,
    filename: &str,
    content_type: &str,
) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| ApiError::NotFound(format!("File {} not found on the system!", filename)))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
