// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kron daemon library
//!
//! Command-line surface, configuration, and the signal controller that
//! drives the scheduler registry. The `kron` binary is a thin shell over
//! these pieces.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cli;
pub mod controller;
pub mod env;
pub mod lifecycle;

pub use cli::Cli;
pub use controller::{listen_signals, run_controller, Signal};
pub use lifecycle::{
    load_files, run_test_job, startup, Config, DaemonScheduler, LifecycleError,
};
