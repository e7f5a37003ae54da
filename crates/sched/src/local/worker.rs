// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker loop: dequeue, fork, monitor, record.

use super::LocalWorkerAdapter;
use serde::{Deserialize, Serialize};
use sfrest_core::JobState;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Instant;

/// Task payload persisted on the worker queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedTask {
    pub user: String,
    pub job_id: String,
    pub command: String,
    pub args: Vec<String>,
    pub job_dir: PathBuf,
}

/// Exit code recorded when the soft time limit fires.
pub(crate) const TIMEOUT_EXIT_CODE: i32 = 124;

pub(crate) async fn worker_loop(adapter: Arc<LocalWorkerAdapter>, index: usize) {
    tracing::info!(worker = index, "local worker started");
    loop {
        let popped = match adapter.queue().pop() {
            Ok(popped) => popped,
            Err(e) => {
                tracing::error!(worker = index, error = %e, "queue pop failed");
                None
            }
        };
        match popped {
            Some((job_id, payload)) => match serde_json::from_value::<QueuedTask>(payload) {
                Ok(task) => execute_task(&adapter, task).await,
                Err(e) => {
                    tracing::error!(worker = index, job_id, error = %e, "undecodable task dropped")
                }
            },
            None => tokio::time::sleep(adapter.monitor_period()).await,
        }
    }
}

/// Run one task to completion, writing every state transition to the job
/// store. Store write failures are logged and the task proceeds; the
/// record converges on the next transition that does land.
pub(crate) async fn execute_task(adapter: &LocalWorkerAdapter, task: QueuedTask) {
    let job_id = task.job_id.clone();
    let user = task.user.clone();
    tracing::info!(job_id, user, command = %task.command, "executing task");

    if let Err(e) = std::fs::create_dir_all(&task.job_dir) {
        tracing::warn!(job_id, error = %e, "failed to create job directory");
    }

    let mut command = tokio::process::Command::new(&task.command);
    command.args(&task.args).current_dir(&task.job_dir);
    match log_destination(&task) {
        Some((stdout, stderr)) => {
            command.stdout(stdout).stderr(stderr);
        }
        None => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
    }
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            // Never reached the scheduler: the job dies in ABORTED.
            let status = format!("Failed to start process (err={})", e);
            tracing::error!(job_id, error = %e, "spawn failed");
            record(adapter, &user, &job_id, JobState::Aborted, &status, None, None);
            return;
        }
    };

    let pgid = child.id().map(|pid| pid as i32).unwrap_or(-1);
    if let Err(e) = adapter.jobs().assign_pid(&user, &job_id, &pgid.to_string()) {
        tracing::warn!(job_id, error = %e, "failed to record pid");
    }
    adapter.register_running(&job_id, pgid);
    record(
        adapter,
        &user,
        &job_id,
        JobState::Started,
        "Task started in background",
        None,
        Some(0.0),
    );

    let start = Instant::now();
    let mut ticker = tokio::time::interval(adapter.monitor_period());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // first tick fires immediately

    loop {
        ticker.tick().await;
        match child.try_wait() {
            Ok(Some(status)) => {
                let elapsed = start.elapsed().as_secs_f64();
                let (state, message, exit_code) = terminal_from_exit(status);
                tracing::info!(job_id, state = %state, exit_code, "task finished");
                record(adapter, &user, &job_id, state, &message, Some(exit_code), Some(elapsed));
                break;
            }
            Ok(None) => {
                let elapsed = start.elapsed();
                if elapsed >= adapter.soft_time_limit() {
                    tracing::warn!(job_id, pgid, "soft time limit hit, terminating group");
                    signal_group(pgid, TermSignal::Term);
                    let _ = child.wait().await;
                    record(
                        adapter,
                        &user,
                        &job_id,
                        JobState::TimedOut,
                        "Task exceeded soft time limit and was terminated",
                        Some(TIMEOUT_EXIT_CODE),
                        Some(elapsed.as_secs_f64()),
                    );
                    break;
                }
                record(
                    adapter,
                    &user,
                    &job_id,
                    JobState::Running,
                    "Task running in background",
                    None,
                    Some(elapsed.as_secs_f64()),
                );
            }
            Err(e) => {
                tracing::error!(job_id, error = %e, "failed to poll subprocess");
                let _ = child.wait().await;
                record(
                    adapter,
                    &user,
                    &job_id,
                    JobState::Failure,
                    &format!("Failed to poll process (err={})", e),
                    None,
                    Some(start.elapsed().as_secs_f64()),
                );
                break;
            }
        }
    }

    adapter.deregister_running(&job_id);
}

/// Map a subprocess exit status into the common taxonomy.
pub(crate) fn terminal_from_exit(status: ExitStatus) -> (JobState, String, i32) {
    if let Some(code) = status.code() {
        if code == 0 {
            (JobState::Success, "Process terminated with success".to_string(), 0)
        } else {
            (
                JobState::Failure,
                format!("Process terminated with return code {}", code),
                code,
            )
        }
    } else {
        let signal = exit_signal(status).unwrap_or(0);
        (
            JobState::Failure,
            format!("Process terminated by signal {}", signal),
            -signal,
        )
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

pub(crate) enum TermSignal {
    Term,
    Kill,
}

/// Signal the whole process group so children of the entrypoint go too.
#[cfg(unix)]
pub(crate) fn signal_group(pgid: i32, signal: TermSignal) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if pgid <= 0 {
        return;
    }
    let sig = match signal {
        TermSignal::Term => Signal::SIGTERM,
        TermSignal::Kill => Signal::SIGKILL,
    };
    if let Err(e) = killpg(Pid::from_raw(pgid), sig) {
        tracing::warn!(pgid, error = %e, "killpg failed");
    }
}

#[cfg(not(unix))]
pub(crate) fn signal_group(_pgid: i32, _signal: TermSignal) {}

/// SIGKILL the group (cancellation of an executing task).
pub(crate) fn kill_group(pgid: i32) {
    signal_group(pgid, TermSignal::Kill);
}

fn log_destination(task: &QueuedTask) -> Option<(Stdio, Stdio)> {
    let path = task.job_dir.join(format!("job_{}.log", task.job_id));
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path).ok()?;
    let clone = file.try_clone().ok()?;
    Some((Stdio::from(file), Stdio::from(clone)))
}

fn record(
    adapter: &LocalWorkerAdapter,
    user: &str,
    job_id: &str,
    state: JobState,
    status: &str,
    exit_code: Option<i32>,
    elapsed: Option<f64>,
) {
    if let Err(e) = adapter.jobs().update_status(user, job_id, state, status, exit_code, elapsed) {
        tracing::warn!(job_id, state = %state, error = %e, "job store update failed");
    }
}
