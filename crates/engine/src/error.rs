// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduler and job executor

use kron_adapters::{ProcessError, TriggerError, UserError};
use kron_core::JobId;
use kron_jobfile::{LoadError, SpecError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from registry operations. Fatal to the failing call only.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    InvalidSpec(#[from] SpecError),

    #[error(transparent)]
    InvalidSchedule(#[from] TriggerError),

    #[error("failed to load jobs: {0}")]
    Load(#[from] LoadError),

    #[error("failed to prepare output directory {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from a single invocation
#[derive(Debug, Error)]
pub enum RunError {
    #[error("job {0} is already running")]
    AlreadyRunning(String),

    #[error("job {0} was removed from the scheduler")]
    Retired(String),

    #[error("failed to open output file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidHook(#[from] SpecError),

    #[error("failed to resolve user: {0}")]
    User(#[from] UserError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// One in-flight run that could not be terminated
#[derive(Debug)]
pub struct StopFailure {
    pub job_id: JobId,
    pub name: String,
    pub source: ProcessError,
}

impl fmt::Display for StopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.job_id, self.source)
    }
}

impl std::error::Error for StopFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Every stop failure collected from one `stop` or `clear`
#[derive(Debug, Default)]
pub struct StopErrors {
    failures: Vec<StopFailure>,
}

impl StopErrors {
    pub fn push(&mut self, failure: StopFailure) {
        self.failures.push(failure);
    }

    pub fn failures(&self) -> &[StopFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` when nothing failed
    pub fn into_result(self) -> Result<(), StopErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for StopErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 { "job" } else { "jobs" };
        write!(f, "failed to stop {} {}", self.failures.len(), noun)?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for StopErrors {}

impl IntoIterator for StopErrors {
    type Item = StopFailure;
    type IntoIter = std::vec::IntoIter<StopFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
