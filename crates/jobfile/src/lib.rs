// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Job definitions and job file loading

mod job;
mod parser;

pub use job::{ExecPolicy, HookKind, JobSpec, SpecError};
pub use parser::{load_jobs, parse_jobs, Format, LoadError, ParseError};
