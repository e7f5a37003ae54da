// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared request context.

use crate::auth::AuthAdapter;
use sfrest_apps::AppRegistry;
use sfrest_core::{Config, SchedulerKind, SystemClock};
use sfrest_sched::Scheduler;
use sfrest_store::{AccountingStore, FileStore, JobStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a request handler needs, shared immutably across the router
/// and the background engines.
pub struct AppContext {
    pub config: Config,
    pub registry: AppRegistry,
    pub jobs: JobStore,
    pub files: FileStore,
    pub accounting: AccountingStore,
    /// All constructed adapters, keyed by kind. Cancellation dispatches on
    /// the kind stored in the job record, so jobs submitted under an
    /// earlier scheduler configuration stay cancellable.
    pub schedulers: HashMap<SchedulerKind, Arc<dyn Scheduler>>,
    pub auth: AuthAdapter,
    pub clock: SystemClock,
}

impl AppContext {
    /// Adapter new submissions are dispatched to.
    pub fn active_scheduler(&self) -> Option<&Arc<dyn Scheduler>> {
        self.schedulers.get(&self.config.job_scheduler)
    }

    /// Adapter owning an existing job.
    pub fn scheduler_for(&self, kind: SchedulerKind) -> Option<&Arc<dyn Scheduler>> {
        self.schedulers.get(&kind)
    }
}
