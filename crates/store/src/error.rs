// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid collection name '{0}'")]
    InvalidCollection(String),

    #[error("invalid document id '{0}'")]
    InvalidDocId(String),

    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
}
