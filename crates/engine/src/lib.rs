// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kron execution engine: job executors and the scheduler registry

mod error;
mod executor;
pub mod output;
mod scheduler;

#[cfg(test)]
mod test_helpers;

pub use error::{RunError, SchedulerError, StopErrors, StopFailure};
pub use executor::JobExecutor;
pub use output::{OutputSettings, Retention, RunOutput};
pub use scheduler::{EventReader, Scheduler, EVENT_CHANNEL_CAPACITY};
