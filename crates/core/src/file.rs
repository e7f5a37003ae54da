// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Uploaded-file registration record.

use serde::{Deserialize, Serialize};

/// A file record as stored in the per-user `<user>.files` collection.
///
/// Created when an upload lands on disk; the `filepath` field is never
/// serialized back to clients (listing strips it before responding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque id handed to the client on upload.
    pub fileid: String,
    /// Server-local absolute path.
    pub filepath: String,
    /// Original filename as uploaded.
    pub filename_orig: String,
    /// Extension without the leading dot.
    pub fileext: String,
    /// Size in MB.
    pub filesize: f64,
    /// Upload instant, ISO-8601.
    pub filedate: String,
    /// User-supplied free-form tag.
    #[serde(default)]
    pub tag: String,
}
