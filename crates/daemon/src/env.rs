// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

/// Output directory override (`KRON_OUTPUT_DIR`)
pub fn output_dir() -> Option<PathBuf> {
    non_empty("KRON_OUTPUT_DIR").map(PathBuf::from)
}

/// Output retention policy (`KRON_RETENTION`), unparsed
pub fn retention() -> Option<String> {
    non_empty("KRON_RETENTION")
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
