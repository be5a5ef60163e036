// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration, startup, job loading, one-shot runs.

use std::path::PathBuf;

use kron_adapters::{
    CronTrigger, ProcessAdapter, ShellProcessAdapter, TracedProcess, TriggerAdapter,
};
use kron_core::{IdGen, UuidIdGen};
use kron_engine::{EventReader, OutputSettings, Retention, RunError, Scheduler, SchedulerError};
use thiserror::Error;
use tracing::info;

use crate::cli::Cli;
use crate::env;

/// Scheduler with the production adapters (process runs wrapped with tracing)
pub type DaemonScheduler = Scheduler<CronTrigger, TracedProcess<ShellProcessAdapter>, UuidIdGen>;

/// Daemon configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Job files, loaded in order
    pub files: Vec<PathBuf>,
    /// Directory for per-run output files
    pub output_dir: PathBuf,
    pub retention: Retention,
    pub json_logs: bool,
    /// Log destination; stderr when unset
    pub log_file: Option<PathBuf>,
    /// Job to run once in test mode
    pub test_job: Option<String>,
}

impl Config {
    /// Resolve configuration from flags and environment.
    ///
    /// Output directory: `--output-dir` > `KRON_OUTPUT_DIR` > a new
    /// `kron-*` directory under the system temp dir.
    pub fn load(cli: Cli) -> Result<Self, LifecycleError> {
        let retention = match cli.retention.or_else(env::retention) {
            Some(text) => text
                .parse::<Retention>()
                .map_err(LifecycleError::InvalidRetention)?,
            None => Retention::default(),
        };

        let output_dir = match cli.output_dir.or_else(env::output_dir) {
            Some(dir) => dir,
            None => temp_output_dir()?,
        };

        Ok(Self {
            files: cli.files,
            output_dir,
            retention,
            json_logs: cli.json,
            log_file: cli.log_file,
            test_job: cli.test,
        })
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings::new(&self.output_dir).with_retention(self.retention)
    }
}

fn temp_output_dir() -> Result<PathBuf, LifecycleError> {
    let dir = tempfile::Builder::new()
        .prefix("kron-")
        .tempdir()
        .map_err(|source| LifecycleError::OutputDir {
            path: std::env::temp_dir(),
            source,
        })?;
    // Output outlives the process so hooks and operators can read it
    Ok(dir.keep())
}

/// Errors that end the daemon
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid retention: {0}")]
    InvalidRetention(String),

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install signal handlers: {0}")]
    Signals(std::io::Error),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("no job with the name {0}")]
    NoSuchJob(String),

    #[error(transparent)]
    Run(#[from] RunError),
}

/// Build the production scheduler and the read side of its event channel.
pub fn startup(config: &Config) -> Result<(DaemonScheduler, EventReader), LifecycleError> {
    let process = TracedProcess::new(ShellProcessAdapter::new());
    let (scheduler, events) =
        Scheduler::new(CronTrigger::new(), process, UuidIdGen, config.output_settings())?;
    info!(
        output_dir = %config.output_dir.display(),
        retention = %config.retention,
        "scheduler ready"
    );
    Ok((scheduler, events))
}

/// Add every job from every file, in order. Stops at the first failure.
pub async fn load_files<T, P, I>(
    scheduler: &Scheduler<T, P, I>,
    files: &[PathBuf],
) -> Result<usize, LifecycleError>
where
    T: TriggerAdapter,
    P: ProcessAdapter,
    I: IdGen,
{
    let mut loaded = 0;
    for path in files {
        let ids = scheduler.add_file(path).await?;
        info!(path = %path.display(), jobs = ids.len(), "loaded job file");
        loaded += ids.len();
    }
    Ok(loaded)
}

/// Load `files`, then run the job called `name` once, attached to the
/// terminal. The trigger is never started.
pub async fn run_test_job<T, P, I>(
    scheduler: &Scheduler<T, P, I>,
    files: &[PathBuf],
    name: &str,
) -> Result<(), LifecycleError>
where
    T: TriggerAdapter,
    P: ProcessAdapter,
    I: IdGen,
{
    load_files(scheduler, files).await?;
    let job = scheduler
        .get(name)
        .await
        .ok_or_else(|| LifecycleError::NoSuchJob(name.to_string()))?;
    info!(job = %name, "running job once");
    job.run_attached().await?;
    Ok(())
}

/// Display form of a job file list for log lines
pub fn describe_files(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
