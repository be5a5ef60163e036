// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kron: run jobs on cron schedules
//!
//! Architecture:
//! - Controller task: loads job files, starts the trigger, handles signals
//! - Main task: consumes scheduler events and logs them

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use kron_core::{format_duration, Event};
use kron_daemon::{
    listen_signals, run_controller, run_test_job, startup, Cli, Config, LifecycleError,
};
use kron_engine::EventReader;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::load(Cli::parse())?;
    let _log_guard = setup_logging(&config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting kron");

    let (scheduler, events) = startup(&config)?;
    let scheduler = Arc::new(scheduler);
    let files = config.files.clone();

    let task: JoinHandle<Result<(), LifecycleError>> = match config.test_job.clone() {
        Some(name) => tokio::spawn(async move { run_test_job(&scheduler, &files, &name).await }),
        None => {
            // Install handlers before loading so an early signal is not lost
            let signals = listen_signals()?;
            tokio::spawn(async move { run_controller(&scheduler, &files, signals).await })
        }
    };

    let outcome = consume_events(events, task).await?;
    info!("kron exiting");
    Ok(outcome?)
}

/// Log events until the controller task finishes, then drain what is left.
async fn consume_events<T>(mut events: EventReader, mut task: JoinHandle<T>) -> Result<T> {
    let outcome = loop {
        tokio::select! {
            Some(event) = events.recv() => log_event(&event),
            joined = &mut task => break joined?,
        }
    };
    while let Ok(event) = events.try_recv() {
        log_event(&event);
    }
    Ok(outcome)
}

fn log_event(event: &Event) {
    match event {
        Event::Loaded { job_id, name } => info!(%job_id, job = %name, "job loaded"),
        Event::Started {
            job_id,
            name,
            started_at,
        } => info!(%job_id, job = %name, %started_at, "job started"),
        Event::Finished {
            job_id,
            name,
            duration,
            error: None,
        } => info!(
            %job_id,
            job = %name,
            duration = %format_duration(*duration),
            "job finished"
        ),
        Event::Finished {
            job_id,
            name,
            duration,
            error: Some(error),
        } => warn!(
            %job_id,
            job = %name,
            duration = %format_duration(*duration),
            %error,
            "job failed"
        ),
        Event::Error {
            job_id,
            name,
            error,
        } => error!(%job_id, job = %name, %error, "job error"),
    }
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LifecycleError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(fmt::layer().json().with_writer(writer)).init();
    } else {
        registry.with(fmt::layer().with_writer(writer)).init();
    }

    Ok(guard)
}
