// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run output files.
//!
//! Each primary invocation writes to a pair of files in the output
//! directory:
//!   `<dir>/kron-task-<name>-<job_id>-<run>.log`  (stdout)
//!   `<dir>/kron-task-<name>-<job_id>-<run>.err`  (stderr)

use crate::RunError;
use kron_core::JobId;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What happens to a run's output files once the run and its hook finish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Retention {
    #[default]
    Keep,
    Delete,
}

impl FromStr for Retention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Retention::Keep),
            "delete" => Ok(Retention::Delete),
            other => Err(format!(
                "unknown retention policy '{}' (expected keep or delete)",
                other
            )),
        }
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Retention::Keep => "keep",
            Retention::Delete => "delete",
        })
    }
}

/// Where run output goes and how long it stays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub retention: Retention,
}

impl OutputSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            retention: Retention::Keep,
        }
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }
}

/// Paths of one run's captured output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl RunOutput {
    pub fn for_run(dir: &Path, name: &str, job_id: &JobId, run: u64) -> Self {
        let stem = format!("kron-task-{}-{}-{}", file_safe(name), job_id, run);
        Self {
            stdout: dir.join(format!("{}.log", stem)),
            stderr: dir.join(format!("{}.err", stem)),
        }
    }

    /// Create both files, truncating any leftovers. The stdout file is
    /// closed again if the stderr file cannot be created.
    pub fn open(&self) -> Result<(File, File), RunError> {
        let create = |path: &Path| {
            File::create(path).map_err(|source| RunError::Output {
                path: path.to_path_buf(),
                source,
            })
        };
        let stdout = create(&self.stdout)?;
        let stderr = create(&self.stderr)?;
        Ok((stdout, stderr))
    }

    /// Trailing arguments handed to a completion hook
    pub fn hook_args(&self) -> Vec<String> {
        vec![
            self.stdout.to_string_lossy().into_owned(),
            self.stderr.to_string_lossy().into_owned(),
        ]
    }

    pub fn apply(&self, retention: Retention) {
        if retention == Retention::Keep {
            return;
        }
        for path in [&self.stdout, &self.stderr] {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove run output");
            }
        }
    }
}

/// Keep job names from escaping the output directory
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
