// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch script and job body construction, plus native-state mapping.

use serde_json::{json, Value};
use sfrest_core::JobState;

/// Inputs for one batch submission script.
#[derive(Debug, Clone)]
pub struct BatchScript {
    /// Workload name (the client-chosen job id).
    pub name: String,
    /// Containerized entrypoint image.
    pub image: String,
    /// Synthesized argument string exported as `JOB_OPTIONS`.
    pub arg_string: String,
    /// Job directory as seen from inside the cluster.
    pub cluster_job_dir: String,
    /// Input file as seen from inside the cluster.
    pub cluster_data_path: String,
    /// Seconds to sleep before starting, letting the network mount settle.
    pub mount_settle_sec: u64,
    /// MPI processes (already clamped).
    pub tasks: u32,
    /// Threads per process (already clamped).
    pub cpus_per_task: u32,
}

/// Down-scale a hint that exceeds the configured maximum to 1 for that
/// dimension; values within the limit pass through.
pub fn clamp_to_max(value: u32, max: u32) -> u32 {
    if value > max {
        1
    } else {
        value.max(1)
    }
}

/// Shell script submitted as the batch job body. The entrypoint runs in a
/// container with the server-side directories bind-mounted at their
/// cluster-side paths; multi-process jobs are wrapped in an MPI launcher.
pub fn build_script(params: &BatchScript) -> String {
    let mut script = String::from("#!/bin/bash\n");
    if params.mount_settle_sec > 0 {
        script.push_str(&format!("sleep {}\n", params.mount_settle_sec));
    }

    let run = format!(
        "singularity run --containall --scratch {job_dir} -B {job_dir} -B {data} \
         --env CHANGE_RUNUSER=0 --env JOB_DIR={job_dir} --env JOB_OPTIONS='{args}' \
         --env JOB_OUTDIR={job_dir} {image}",
        job_dir = params.cluster_job_dir,
        data = params.cluster_data_path,
        args = params.arg_string,
        image = params.image,
    );

    if params.tasks > 1 {
        script.push_str(&format!("mpirun -np {} {}\n", params.tasks * params.cpus_per_task, run));
    } else {
        script.push_str(&run);
        script.push('\n');
    }
    script
}

/// JSON job body for the cluster REST submission call.
///
/// The environment field is required by the endpoint even though the docs
/// say otherwise, and the working directory must be writable by the
/// cluster user or the job fails with a permission error on its output.
pub fn build_job_body(params: &BatchScript, partition: &str, workdir: &str) -> Value {
    json!({
        "script": build_script(params),
        "job": {
            "name": params.name,
            "environment": { "PATH": "/bin:/usr/bin/:/usr/local/bin/" },
            "partition": partition,
            "current_working_directory": workdir,
            "tasks": params.tasks,
            "cpus_per_task": params.cpus_per_task,
        }
    })
}

/// Map a native scheduler state into the common taxonomy.
pub fn map_native_state(native: &str) -> (JobState, String) {
    let (state, message) = match native {
        "PENDING" => (JobState::Pending, "Job queued and waiting for initiation"),
        "SUSPENDED" => (JobState::Pending, "Job was suspended"),
        "RUNNING" => (JobState::Running, "Job executing"),
        "COMPLETED" => (JobState::Success, "Job completed execution successfully"),
        "CANCELLED" => (JobState::Canceled, "Job was canceled by user"),
        "FAILED" => (JobState::Failure, "Job completed execution unsuccessfully"),
        "TIMEOUT" => (JobState::TimedOut, "Job terminated due to time limit reached"),
        "NODE_FAIL" => (JobState::Failure, "Job terminated due to node failure"),
        "PREEMPTED" => (JobState::Failure, "Job terminated due to preemption"),
        "BOOT_FAIL" => (JobState::Failure, "Job terminated due to node boot failure"),
        "DEADLINE" => (JobState::Failure, "Job terminated on deadline"),
        "OUT_OF_MEMORY" => {
            (JobState::Failure, "Job terminated due to experienced out of memory error")
        }
        other => {
            return (
                JobState::Unknown,
                format!("Job currently in unknown state (raw state={})", other),
            )
        }
    };
    (state, message.to_string())
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
