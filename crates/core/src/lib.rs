// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kron-core: shared types for the kron job scheduler

pub mod event;
pub mod id;
pub mod job;
pub mod time_fmt;

pub use event::Event;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::JobId;
pub use time_fmt::{format_duration, format_elapsed, parse_duration, DurationError};
