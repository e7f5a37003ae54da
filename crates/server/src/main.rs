// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sfrestd` — the source-finder job service daemon.

use clap::Parser;
use sfrest_core::{Config, SchedulerKind};
use sfrest_server::Service;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sfrestd", about = "Multi-tenant source-finder job service", version)]
struct Cli {
    /// TOML configuration file; defaults apply for every missing option.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the job scheduler backend {local, orchestrator, hpc}.
    #[arg(long)]
    scheduler: Option<SchedulerKind>,

    /// Override the job root directory.
    #[arg(long)]
    job_root: Option<PathBuf>,

    /// Override the data root directory.
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Override the document store location.
    #[arg(long)]
    doc_store_uri: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config, sfrest_core::ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(scheduler) = self.scheduler {
            config.job_scheduler = scheduler;
        }
        if let Some(job_root) = self.job_root {
            config.job_root = job_root;
        }
        if let Some(data_root) = self.data_root {
            config.data_root = data_root;
        }
        if let Some(uri) = self.doc_store_uri {
            config.doc_store_uri = uri;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "service failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    tracing::info!(
        scheduler = %config.job_scheduler,
        job_root = %config.job_root.display(),
        data_root = %config.data_root.display(),
        "starting service"
    );

    let service = Service::build(config).await?;
    let _background = service.start_background();
    service.serve().await?;
    Ok(())
}
