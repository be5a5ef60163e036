// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: child processes, clocks, and the user database

pub mod env;
pub mod process;
pub mod traced;
pub mod trigger;
pub mod user;

pub use env::{compose_env, DEFAULT_PATH};
pub use process::{
    process_context, ProcessAdapter, ProcessContext, ProcessError, ProcessHandle, ProcessSpec,
    Program, ShellProcessAdapter, Sink,
};
pub use traced::TracedProcess;
pub use trigger::{
    CronTrigger, FireFn, FireFuture, Schedule, SubscriptionId, TriggerAdapter, TriggerError,
};
pub use user::{resolve_user, UserError, UserIdentity};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeOutcome, FakeProcessAdapter, ProcessCall};
#[cfg(any(test, feature = "test-support"))]
pub use trigger::{FakeTrigger, TriggerCall};
