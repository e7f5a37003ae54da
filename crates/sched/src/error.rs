// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler adapter errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The backend refused the submission.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// Timeout or connection error talking to a remote backend. The next
    /// reconciliation tick retries; never surfaced as success.
    #[error("remote scheduler unreachable: {0}")]
    Remote(String),

    /// Token or credential problem on the HPC REST path.
    #[error("scheduler auth failed: {0}")]
    Auth(String),

    /// Reply from the backend could not be interpreted.
    #[error("malformed scheduler reply: {0}")]
    MalformedReply(String),

    #[error("cancel failed: {0}")]
    Cancel(String),

    #[error(transparent)]
    Store(#[from] sfrest_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
