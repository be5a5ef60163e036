// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline and termination plumbing for a running process

use super::ProcessError;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

type KillAck = oneshot::Sender<Result<(), ProcessError>>;

/// Create a linked handle/context pair for one run.
///
/// A timeout too large to place on the clock imposes no deadline.
pub fn process_context(timeout: Option<Duration>) -> (ProcessHandle, ProcessContext) {
    let (kill_tx, kill_rx) = mpsc::channel(1);
    let ctx = ProcessContext {
        deadline: timeout.and_then(|t| Instant::now().checked_add(t).map(|at| (at, t))),
        kill_rx: Some(kill_rx),
    };
    (ProcessHandle { kill_tx }, ctx)
}

/// Owner's side of a run: requests termination.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    kill_tx: mpsc::Sender<KillAck>,
}

impl ProcessHandle {
    /// Ask the process to terminate and wait for the kill outcome.
    ///
    /// Returns `Ok` when the run has already finished.
    pub async fn terminate(&self) -> Result<(), ProcessError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.kill_tx.send(ack_tx).await.is_err() {
            return Ok(());
        }
        ack_rx.await.unwrap_or(Ok(()))
    }
}

/// Why a run must end early
#[derive(Debug)]
pub enum Cancel {
    /// The deadline passed; carries the configured timeout
    Deadline(Duration),
    /// The handle asked for termination
    Terminate(KillRequest),
}

/// A pending termination request; the adapter reports the kill result.
#[derive(Debug)]
pub struct KillRequest(KillAck);

impl KillRequest {
    pub fn reply(self, result: Result<(), ProcessError>) {
        // Requester may have given up waiting
        let _ = self.0.send(result);
    }
}

/// Adapter's side of a run: observes the deadline and kill requests.
#[derive(Debug)]
pub struct ProcessContext {
    deadline: Option<(Instant, Duration)>,
    kill_rx: Option<mpsc::Receiver<KillAck>>,
}

enum Next {
    Deadline(Duration),
    Request(Option<KillAck>),
}

impl ProcessContext {
    /// A context with no deadline that can never be terminated.
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            kill_rx: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.deadline.map(|(_, t)| t)
    }

    /// Wait until the run must end. Never resolves for an unbounded
    /// context whose handle is gone. Cancel safe.
    pub async fn cancelled(&mut self) -> Cancel {
        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some((at, timeout)) => {
                    tokio::time::sleep_until(at).await;
                    timeout
                }
                None => std::future::pending().await,
            }
        };
        tokio::pin!(expiry);

        loop {
            let next = match self.kill_rx.as_mut() {
                Some(rx) => tokio::select! {
                    timeout = &mut expiry => Next::Deadline(timeout),
                    req = rx.recv() => Next::Request(req),
                },
                None => Next::Deadline((&mut expiry).await),
            };
            match next {
                Next::Deadline(timeout) => return Cancel::Deadline(timeout),
                Next::Request(Some(ack)) => return Cancel::Terminate(KillRequest(ack)),
                // Every handle dropped: only the deadline remains
                Next::Request(None) => self.kill_rx = None,
            }
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
