// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process execution adapters
//!
//! A [`ProcessSpec`] describes one child process completely: program,
//! arguments, working directory, environment, identity, and where its
//! output streams go. A [`ProcessContext`] bounds the run with an optional
//! deadline and lets the owner of the matching [`ProcessHandle`] ask for
//! early termination.

mod context;
mod shell;

pub use context::{process_context, Cancel, KillRequest, ProcessContext, ProcessHandle};
pub use shell::ShellProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOutcome, FakeProcessAdapter, ProcessCall};

use crate::user::UserIdentity;
use async_trait::async_trait;
use kron_core::format_duration;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;

/// Errors from running a process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("nothing to run: empty command")]
    EmptyCommand,

    #[error("failed to prepare script: {0}")]
    Script(std::io::Error),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("process exited with {}", describe_exit(*.code))]
    Exited { code: Option<i32> },

    #[error("timed out after {}", format_duration(*.0))]
    TimedOut(Duration),

    #[error("terminated by stop request")]
    Terminated,

    #[error("failed to terminate process: {0}")]
    Kill(std::io::Error),

    #[error("failed waiting for process: {0}")]
    Wait(std::io::Error),
}

impl ProcessError {
    /// True when the process was ended by a deadline or a stop request
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ProcessError::TimedOut(_) | ProcessError::Terminated)
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Executable followed by its arguments
    Argv(Vec<String>),
    /// Script body handed to an interpreter as a file
    Script {
        interpreter: Vec<String>,
        body: String,
    },
}

impl Program {
    /// Short name for logs: the executable or the interpreter
    pub fn name(&self) -> &str {
        match self {
            Program::Argv(argv) => argv.first().map(String::as_str).unwrap_or(""),
            Program::Script { interpreter, .. } => {
                interpreter.first().map(String::as_str).unwrap_or("sh")
            }
        }
    }
}

/// Destination for a child's output stream
#[derive(Debug)]
pub enum Sink {
    /// Discard output
    Null,
    /// Share the scheduler's own stream
    Inherit,
    /// Write to an open file
    File(std::fs::File),
}

impl Sink {
    fn into_stdio(self) -> Stdio {
        match self {
            Sink::Null => Stdio::null(),
            Sink::Inherit => Stdio::inherit(),
            Sink::File(file) => Stdio::from(file),
        }
    }
}

/// Complete description of one child process
#[derive(Debug)]
pub struct ProcessSpec {
    pub program: Program,
    /// Extra arguments appended after the program's own
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
    /// The child's entire environment; nothing is inherited
    pub env: Vec<(String, String)>,
    pub user: Option<UserIdentity>,
    pub stdout: Sink,
    pub stderr: Sink,
}

impl ProcessSpec {
    /// A spec with no extra args, no env, and discarded output
    pub fn new(program: Program) -> Self {
        Self {
            program,
            args: Vec::new(),
            workdir: None,
            env: Vec::new(),
            user: None,
            stdout: Sink::Null,
            stderr: Sink::Null,
        }
    }
}

/// Adapter for running child processes to completion
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Run the process until it exits, its deadline passes, or it is
    /// terminated through the context's handle.
    async fn run(&self, spec: ProcessSpec, ctx: ProcessContext) -> Result<(), ProcessError>;
}
