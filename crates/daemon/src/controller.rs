// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reload/stop controller
//!
//! Loads the job files, starts the trigger, then reacts to process
//! signals: reload clears the registry and loads everything again, and
//! stop terminates in-flight runs before the daemon exits.

use std::path::PathBuf;

use kron_adapters::{ProcessAdapter, TriggerAdapter};
use kron_core::IdGen;
use kron_engine::Scheduler;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::lifecycle::{describe_files, load_files, LifecycleError};

/// What a process signal asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGUSR1 or SIGHUP
    Reload,
    /// SIGINT or SIGTERM
    Stop,
}

/// Forward process signals as [`Signal`]s.
///
/// Handlers are installed before this returns, so a signal sent right
/// after is not lost.
pub fn listen_signals() -> Result<mpsc::Receiver<Signal>, LifecycleError> {
    let mut usr1 = signal(SignalKind::user_defined1()).map_err(LifecycleError::Signals)?;
    let mut hup = signal(SignalKind::hangup()).map_err(LifecycleError::Signals)?;
    let mut int = signal(SignalKind::interrupt()).map_err(LifecycleError::Signals)?;
    let mut term = signal(SignalKind::terminate()).map_err(LifecycleError::Signals)?;

    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                _ = usr1.recv() => Signal::Reload,
                _ = hup.recv() => Signal::Reload,
                _ = int.recv() => Signal::Stop,
                _ = term.recv() => Signal::Stop,
            };
            if tx.send(next).await.is_err() {
                break;
            }
        }
    });
    Ok(rx)
}

/// Drive the scheduler until a stop signal arrives.
///
/// Returns an error only when the job files cannot be loaded, initially
/// or on reload. Stop failures are reported on stderr and do not fail
/// the daemon. A closed signal channel counts as a stop.
pub async fn run_controller<T, P, I>(
    scheduler: &Scheduler<T, P, I>,
    files: &[PathBuf],
    mut signals: mpsc::Receiver<Signal>,
) -> Result<(), LifecycleError>
where
    T: TriggerAdapter,
    P: ProcessAdapter,
    I: IdGen,
{
    let loaded = load_files(scheduler, files).await?;
    scheduler.start().await;
    info!(jobs = loaded, files = %describe_files(files), "waiting for signals");

    loop {
        match signals.recv().await {
            Some(Signal::Reload) => reload(scheduler, files).await?,
            Some(Signal::Stop) | None => break,
        }
    }

    info!("stopping scheduler");
    if let Err(e) = scheduler.stop().await {
        error!(error = %e, "stop failed");
        eprintln!("{e}");
    }
    Ok(())
}

async fn reload<T, P, I>(
    scheduler: &Scheduler<T, P, I>,
    files: &[PathBuf],
) -> Result<(), LifecycleError>
where
    T: TriggerAdapter,
    P: ProcessAdapter,
    I: IdGen,
{
    info!("reloading job files");
    if let Err(e) = scheduler.clear().await {
        error!(error = %e, "clear failed, reloading anyway");
        eprintln!("{e}");
    }

    let loaded = load_files(scheduler, files).await?;
    scheduler.start().await;
    info!(jobs = loaded, "reload complete");
    Ok(())
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
