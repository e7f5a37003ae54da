// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service factory and lifecycle.

use crate::auth::AuthAdapter;
use crate::context::AppContext;
use crate::routes;
use sfrest_apps::AppRegistry;
use sfrest_core::{Config, SchedulerKind, SystemClock};
use sfrest_engine::{Accounter, Reconciler};
use sfrest_sched::{HpcScheduler, LocalWorkerAdapter, OrchestratorScheduler, Scheduler};
use sfrest_store::{AccountingStore, DocStore, FileStore, JobStore, WorkQueue};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] sfrest_core::ConfigError),

    #[error(transparent)]
    Store(#[from] sfrest_store::StoreError),

    #[error(transparent)]
    Scheduler(#[from] sfrest_sched::SchedulerError),

    #[error("auth setup failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully wired service: shared context plus the background engines.
pub struct Service {
    pub ctx: Arc<AppContext>,
    local: Arc<LocalWorkerAdapter>,
    reconciler: Arc<Reconciler>,
    accounter: Arc<Accounter<SystemClock>>,
}

impl Service {
    /// Assemble stores, registry, adapters, and engines from one immutable
    /// configuration value.
    pub async fn build(config: Config) -> Result<Self, ServiceError> {
        std::fs::create_dir_all(&config.job_root)?;
        std::fs::create_dir_all(&config.data_root)?;

        let docs = Arc::new(DocStore::open(config.doc_store_dir())?);
        let jobs = JobStore::new(docs.clone());
        let files = FileStore::new(docs.clone());
        let accounting = AccountingStore::new(docs.clone());
        let queue = Arc::new(WorkQueue::open(docs)?);

        let registry = AppRegistry::from_config(&config);

        // The local adapter always exists (its queue may hold items from a
        // previous run); remote adapters only when selected.
        let local = Arc::new(LocalWorkerAdapter::new(queue, jobs.clone(), &config));
        let mut schedulers: HashMap<SchedulerKind, Arc<dyn Scheduler>> = HashMap::new();
        schedulers.insert(SchedulerKind::Local, local.clone());
        match config.job_scheduler {
            SchedulerKind::Local => {}
            SchedulerKind::Orchestrator => {
                let adapter = OrchestratorScheduler::new(&config).await?;
                schedulers.insert(SchedulerKind::Orchestrator, Arc::new(adapter));
            }
            SchedulerKind::Hpc => {
                let adapter = HpcScheduler::new(&config)?;
                schedulers.insert(SchedulerKind::Hpc, Arc::new(adapter));
            }
        }

        let auth = AuthAdapter::from_config(&config).map_err(|e| ServiceError::Auth(e.to_string()))?;

        let reconciler = Arc::new(Reconciler::new(jobs.clone(), schedulers.clone()));
        let accounter = Arc::new(Accounter::new(
            jobs.clone(),
            accounting.clone(),
            config.data_root.clone(),
            config.job_root.clone(),
            SystemClock,
        ));

        let ctx = Arc::new(AppContext {
            registry,
            jobs,
            files,
            accounting,
            schedulers,
            auth,
            clock: SystemClock,
            config,
        });

        Ok(Self { ctx, local, reconciler, accounter })
    }

    /// Start the worker pool and the two tickers.
    pub fn start_background(&self) -> Vec<tokio::task::JoinHandle<()>> {
        let config = &self.ctx.config;
        let mut handles = self.local.spawn_workers(config.local_workers);
        handles.push(
            Arc::clone(&self.reconciler).spawn(Duration::from_secs(config.monitor_period_sec.max(1))),
        );
        handles.push(
            Arc::clone(&self.accounter)
                .spawn(Duration::from_secs(config.accounter_period_sec.max(1))),
        );
        handles
    }

    /// Serve the HTTP surface until interrupted.
    pub async fn serve(self) -> Result<(), ServiceError> {
        let bind_addr = self.ctx.config.bind_addr.clone();
        let router = routes::router(self.ctx);

        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        tracing::info!(addr = %bind_addr, "HTTP surface listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("shutdown signal received");
            })
            .await?;
        Ok(())
    }
}
