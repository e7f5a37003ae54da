// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] sfrest_store::StoreError),

    #[error(transparent)]
    Scheduler(#[from] sfrest_sched::SchedulerError),

    #[error("job directory {0} not found")]
    MissingJobDir(PathBuf),

    #[error("artifact '{artifact}' not found for job {job_id}")]
    ArtifactNotFound { job_id: String, artifact: &'static str },

    #[error("bad artifact glob: {0}")]
    Pattern(#[from] glob::PatternError),
}
