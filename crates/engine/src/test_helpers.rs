// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::executor::JobExecutor;
use crate::output::OutputSettings;
use kron_adapters::FakeProcessAdapter;
use kron_core::{Event, JobId, SequentialIdGen};
use kron_jobfile::{ExecPolicy, JobSpec};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// A job that runs `command` on an hourly schedule
pub(crate) fn job(name: &str, command: &str) -> JobSpec {
    JobSpec {
        name: name.to_string(),
        schedule: "@hourly".to_string(),
        exec: policy(command),
        ..JobSpec::default()
    }
}

pub(crate) fn policy(command: &str) -> ExecPolicy {
    ExecPolicy {
        command: command.to_string(),
        ..ExecPolicy::default()
    }
}

/// Executor wired to a fake process adapter and a temp output dir.
pub(crate) struct ExecHarness {
    pub executor: Arc<JobExecutor<FakeProcessAdapter>>,
    pub process: FakeProcessAdapter,
    pub events: mpsc::Receiver<Event>,
    pub dir: TempDir,
}

pub(crate) fn executor(spec: JobSpec) -> ExecHarness {
    executor_with(spec, SequentialIdGen::new("task"), |settings| settings)
}

pub(crate) fn executor_with(
    spec: JobSpec,
    names: SequentialIdGen,
    settings: impl FnOnce(OutputSettings) -> OutputSettings,
) -> ExecHarness {
    let dir = TempDir::new().unwrap();
    let process = FakeProcessAdapter::new();
    let (tx, events) = mpsc::channel(100);
    let executor = JobExecutor::new(
        JobId::new("job-1"),
        spec,
        process.clone(),
        tx,
        settings(OutputSettings::new(dir.path())),
        names,
    );
    ExecHarness {
        executor: Arc::new(executor),
        process,
        events,
        dir,
    }
}

/// Everything currently buffered on the channel
pub(crate) fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Receive until `n` events arrived or a generous deadline passed
pub(crate) async fn collect(rx: &mut mpsc::Receiver<Event>, n: usize) -> Vec<Event> {
    let mut events = Vec::new();
    while events.len() < n {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(event)) => events.push(event),
            _ => break,
        }
    }
    events
}

/// `(kind, name)` pairs for order assertions
pub(crate) fn outline(events: &[Event]) -> Vec<(&'static str, String)> {
    events
        .iter()
        .map(|e| (e.kind(), e.job_name().to_string()))
        .collect()
}

pub(crate) fn finished_error(event: &Event) -> Option<&str> {
    match event {
        Event::Finished { error, .. } => error.as_deref(),
        other => panic!("expected finished event, got {:?}", other),
    }
}
