// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Cancel, ProcessAdapter, ProcessContext, ProcessError, ProcessSpec, Program};
use crate::user::UserIdentity;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How a faked process behaves, keyed by program name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeOutcome {
    /// Exit 0 immediately
    Succeed,
    /// Exit with the given code immediately
    Fail(i32),
    /// Run until released, timed out, or terminated
    Block,
    /// Like `Block`, but every kill attempt fails
    Unkillable,
}

/// Recorded process run
#[derive(Debug, Clone)]
pub struct ProcessCall {
    pub program: Program,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub user: Option<UserIdentity>,
    pub timeout: Option<Duration>,
}

impl ProcessCall {
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct FakeProcessState {
    outcomes: HashMap<String, FakeOutcome>,
    calls: Vec<ProcessCall>,
    running: usize,
}

/// Fake process adapter for testing
#[derive(Clone)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
    release: Arc<watch::Sender<bool>>,
}

impl Default for FakeProcessAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeProcessState {
                outcomes: HashMap::new(),
                calls: Vec::new(),
                running: 0,
            })),
            release: Arc::new(watch::channel(false).0),
        }
    }
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the behavior for a program (default: `Succeed`)
    pub fn set_outcome(&self, program: &str, outcome: FakeOutcome) {
        self.inner
            .lock()
            .outcomes
            .insert(program.to_string(), outcome);
    }

    /// Let every blocked process exit successfully
    pub fn release(&self) {
        self.release.send_replace(true);
    }

    /// Get all recorded runs
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of runs currently in progress
    pub fn running(&self) -> usize {
        self.inner.lock().running
    }

    /// Wait until at least `n` runs have started
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1000 {
            if self.inner.lock().calls.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn outcome_for(&self, program: &Program) -> FakeOutcome {
        self.inner
            .lock()
            .outcomes
            .get(program.name())
            .copied()
            .unwrap_or(FakeOutcome::Succeed)
    }

    async fn block(&self, ctx: &mut ProcessContext, kill_fails: bool) -> Result<(), ProcessError> {
        let mut released = self.release.subscribe();
        loop {
            tokio::select! {
                _ = released.wait_for(|r| *r) => return Ok(()),
                cancel = ctx.cancelled() => match cancel {
                    Cancel::Deadline(timeout) => return Err(ProcessError::TimedOut(timeout)),
                    Cancel::Terminate(req) if kill_fails => {
                        req.reply(Err(ProcessError::Kill(std::io::Error::other("kill refused"))));
                    }
                    Cancel::Terminate(req) => {
                        req.reply(Ok(()));
                        return Err(ProcessError::Terminated);
                    }
                },
            }
        }
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn run(&self, spec: ProcessSpec, mut ctx: ProcessContext) -> Result<(), ProcessError> {
        let outcome = self.outcome_for(&spec.program);
        {
            let mut inner = self.inner.lock();
            inner.calls.push(ProcessCall {
                program: spec.program,
                args: spec.args,
                workdir: spec.workdir,
                env: spec.env,
                user: spec.user,
                timeout: ctx.timeout(),
            });
            inner.running += 1;
        }

        let result = match outcome {
            FakeOutcome::Succeed => Ok(()),
            FakeOutcome::Fail(code) => Err(ProcessError::Exited { code: Some(code) }),
            FakeOutcome::Block => self.block(&mut ctx, false).await,
            FakeOutcome::Unkillable => self.block(&mut ctx, true).await,
        };

        self.inner.lock().running -= 1;
        result
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
